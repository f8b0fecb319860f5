use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::DealerError;
use crate::middleware::extract::ApiJson;
use crate::server::router::DealerState;
use crate::types::api::ApiMessage;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/login -> 200 on a match, generic 401 otherwise. No session is issued.
pub async fn login(
    State(state): State<DealerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiMessage>, DealerError> {
    state
        .credentials
        .verify(req.username.trim(), &req.password)
        .await?;
    Ok(Json(ApiMessage::new("Login bem-sucedido")))
}
