use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::upstream::{Endpoint, UpstreamError};

/// Why a city could not be resolved. Shared behind an `Arc` because one
/// failure may be delivered to several waiters on the same cache key.
#[derive(Error, Debug)]
pub enum LookupFailure {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("{endpoint} response has no `{field}`")]
    MissingField {
        field: &'static str,
        endpoint: Endpoint,
    },
}

impl LookupFailure {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            LookupFailure::Upstream(e) => e.endpoint(),
            LookupFailure::MissingField { endpoint, .. } => *endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("City not found")]
    CityNotFound(#[source] Arc<LookupFailure>),
    #[error("City image not found")]
    CityImageNotFound(#[source] Arc<LookupFailure>),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Callers cannot tell an unknown city from a failing upstream; both are 404.
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }
}
