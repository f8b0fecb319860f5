use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Process-wide configuration, resolved once on first access.
///
/// Only the binary entrypoint reads this; services receive what they need
/// through their constructors so tests can build them from a local `Config`.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub financing: FinancingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Directory of client pages served as the router fallback.
    pub public_dir: Option<PathBuf>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:mybmotos.db".to_string(),
            loglevel: "info".to_string(),
            public_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Filesystem directory exposed read-only under `/assets`.
    pub assets_dir: PathBuf,
    /// Upload destination, relative to `assets_dir`.
    pub upload_subdir: String,
    pub max_upload_files: usize,
    pub max_body_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            upload_subdir: "img/motos".to_string(),
            max_upload_files: 10,
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingConfig {
    pub monthly_rate: Decimal,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            monthly_rate: Decimal::new(199, 4),
        }
    }
}

impl Config {
    /// Defaults, then `config.toml` (if present), then `MYB_*` env vars.
    /// Nested keys use a double underscore: `MYB_BASIC__LISTEN_ADDR`.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("MYB_").split("__"))
    }

    /// Credentials to provision at startup, if both halves are configured.
    pub fn admin_bootstrap(&self) -> Option<(&str, &str)> {
        match (self.admin.username.as_deref(), self.admin.password.as_deref()) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => Some((u.trim(), p)),
            _ => None,
        }
    }
}
