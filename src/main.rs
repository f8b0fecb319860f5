use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &mybmotos::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        assets_dir = %cfg.storage.assets_dir.display(),
        upload_subdir = %cfg.storage.upload_subdir,
        public_dir = %cfg
            .basic
            .public_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string()),
        loglevel = %cfg.basic.loglevel
    );

    let pool = mybmotos::db::connect(&cfg.basic.database_url).await?;
    let state = mybmotos::DealerState::new(pool, cfg);

    if let Some((username, password)) = cfg.admin_bootstrap() {
        match state.credentials.ensure_user(username, password).await {
            Ok(true) => info!(username, "bootstrap admin created"),
            Ok(false) => info!(username, "bootstrap admin already present"),
            Err(e) => warn!(username, error = %e, "failed to provision bootstrap admin"),
        }
    }

    let app = mybmotos::dealer_router(state);

    let addr = cfg.basic.listen_addr.as_str();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
