use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use service::errors::ServiceError;

/// Transport-level error: the only place service failures and validation
/// rejections turn into HTTP statuses and JSON bodies.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Field-level constraint violations, keyed by offending field.
    Validation(BTreeMap<String, Vec<String>>),
    /// Anything unclassified. Detail is logged, never sent to the caller.
    Internal,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::BadRequest(msg),
            ServiceError::Storage(msg) => {
                error!(error = %msg, "storage failure");
                ApiError::Internal
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        ApiError::Validation(fields)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let timestamp = Utc::now();
        let (status, body) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({"timestamp": timestamp, "message": msg, "details": "resource not found"}),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"timestamp": timestamp, "message": msg, "details": "invalid request"}),
            ),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"timestamp": timestamp, "message": "validation failed", "errors": fields}),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"timestamp": timestamp, "message": "internal server error", "details": "internal server error"}),
            ),
        };
        (status, Json(body)).into_response()
    }
}
