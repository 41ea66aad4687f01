use axum::{
    extract::rejection::QueryRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use hr_core::iso_timestamp;
use serde::Serialize;
use thiserror::Error;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] hr_core::Error),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }

        JsonResponse::new(
            status,
            ErrorBody {
                success: false,
                error: self.to_string(),
                timestamp: iso_timestamp(Utc::now()),
            },
        )
        .into_response()
    }
}

/// JSON body with an explicit `charset=utf-8` content type.
pub struct JsonResponse<T> {
    status: StatusCode,
    body: T,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        let (status, bytes) = match serde_json::to_vec(&self.body) {
            Ok(bytes) => (self.status, bytes),
            Err(e) => {
                tracing::error!("failed to serialize response body: {}", e);
                let fallback = serde_json::json!({
                    "success": false,
                    "error": format!("Serialization error: {}", e),
                    "timestamp": iso_timestamp(Utc::now()),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, fallback.to_string().into_bytes())
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
            bytes,
        )
            .into_response()
    }
}
