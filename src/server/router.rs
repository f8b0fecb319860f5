use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{delete, get, post},
};
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::SqlitePool;
use crate::handlers::{auth, financing, listings};
use crate::middleware::listing_form::UploadLimits;
use crate::service::credential_check::CredentialChecker;
use crate::service::financing::FinancingSimulator;
use crate::service::image_store::ImageStore;
use crate::service::listing_read::ListingReader;
use crate::service::listing_write::ListingWriter;

/// Shared handles for every route, built from one injected pool.
#[derive(Clone)]
pub struct DealerState {
    pub reader: ListingReader,
    pub writer: ListingWriter,
    pub credentials: CredentialChecker,
    pub financing: FinancingSimulator,
    pub upload_limits: UploadLimits,
    assets_dir: PathBuf,
    public_dir: Option<PathBuf>,
    max_body_bytes: usize,
}

impl DealerState {
    pub fn new(pool: SqlitePool, cfg: &Config) -> Self {
        let images = ImageStore::new(&cfg.storage.assets_dir, &cfg.storage.upload_subdir);
        Self {
            reader: ListingReader::new(pool.clone()),
            writer: ListingWriter::new(pool.clone(), images),
            credentials: CredentialChecker::new(pool),
            financing: FinancingSimulator::new(cfg.financing.monthly_rate),
            upload_limits: UploadLimits {
                max_files: cfg.storage.max_upload_files,
            },
            assets_dir: cfg.storage.assets_dir.clone(),
            public_dir: cfg.basic.public_dir.clone(),
            max_body_bytes: cfg.storage.max_body_bytes,
        }
    }
}

impl FromRef<DealerState> for UploadLimits {
    fn from_ref(state: &DealerState) -> Self {
        state.upload_limits
    }
}

pub fn dealer_router(state: DealerState) -> Router {
    let api = Router::new()
        .route(
            "/api/motos",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/api/motos/destaques", get(listings::featured_listings))
        .route(
            "/api/motos/{id}",
            get(listings::listing_detail)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/api/imagens/{id}", delete(listings::delete_image))
        .route("/api/marcas", get(listings::list_brands))
        .route("/api/login", post(auth::login))
        .route("/api/financiamento", get(financing::simulate))
        .nest_service("/assets", ServeDir::new(&state.assets_dir));

    let api = match state.public_dir.as_ref() {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    api.layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
