//! HTTP-layer error type (§7's "adapter boundaries still use
//! `anyhow::Result`" policy, specialised to axum responses).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::ApiErrorDto;

pub enum ApiError {
    NotFound,
    Pending,
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> ApiError {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found".to_string()),
            ApiError::Pending => (StatusCode::ACCEPTED, "pending".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                log::error!("request failed: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
            }
        };
        (status, Json(ApiErrorDto { error })).into_response()
    }
}
