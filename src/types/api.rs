use serde::Serialize;

/// Success envelope for reads: `{"message": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiData<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> ApiData<T> {
    pub fn success(data: T) -> Self {
        Self {
            message: "success",
            data,
        }
    }
}

/// Envelope for writes and login.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ApiMessage {
    pub fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }

    pub fn with_id(message: &'static str, id: i64) -> Self {
        Self {
            message,
            id: Some(id),
        }
    }
}
