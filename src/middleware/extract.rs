//! Wrappers over axum's stock extractors whose rejections go through
//! `DealerError`, so malformed paths, queries and JSON bodies answer with the
//! same JSON error shape as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::DealerError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DealerError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(DealerError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(DealerError))]
pub struct ApiJson<T>(pub T);
