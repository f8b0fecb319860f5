use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

#[derive(Debug, ThisError)]
pub enum DealerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Multipart rejected: {0}")]
    MultipartRejected(#[from] MultipartRejection),

    #[error("Path rejected: {0}")]
    PathRejected(#[from] PathRejection),

    #[error("Query rejected: {0}")]
    QueryRejected(#[from] QueryRejection),

    #[error("JSON body rejected: {0}")]
    JsonRejected(#[from] JsonRejection),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl DealerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<argon2::password_hash::Error> for DealerError {
    fn from(e: argon2::password_hash::Error) -> Self {
        DealerError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for DealerError {
    fn into_response(self) -> axum::response::Response {
        if matches!(
            self,
            DealerError::DatabaseError(_) | DealerError::Io(_) | DealerError::PasswordHash(_)
        ) {
            error!(error = %self, "request failed with internal error");
        }
        let (status, code, message) = match self {
            DealerError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            DealerError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            DealerError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                INVALID_CREDENTIALS.to_string(),
            ),
            DealerError::Multipart(e) => {
                let status = e.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "VALIDATION_ERROR"
                };
                (status, code, e.body_text())
            }
            DealerError::MultipartRejected(e) => {
                (e.status(), "VALIDATION_ERROR", e.body_text())
            }
            DealerError::PathRejected(e) => (e.status(), "VALIDATION_ERROR", e.body_text()),
            DealerError::QueryRejected(e) => (e.status(), "VALIDATION_ERROR", e.body_text()),
            DealerError::JsonRejected(e) => (e.status(), "VALIDATION_ERROR", e.body_text()),
            DealerError::DatabaseError(_) | DealerError::Io(_) | DealerError::PasswordHash(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
        };
        let body = ApiErrorResponse {
            message: message.clone(),
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub message: String,
    pub error: ApiErrorBody,
}
