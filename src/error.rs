use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;
use crate::models::InvalidField;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(id) => AppError::InvalidIdentifier(id),
            other => AppError::Store(other),
        }
    }
}

impl From<InvalidField> for AppError {
    fn from(err: InvalidField) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    // Malformed and missing ids share 404; validation and store failures share 400.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                warn!("rejected request: {}", msg);
                StatusCode::BAD_REQUEST.into_response()
            }
            AppError::InvalidIdentifier(_) | AppError::NotFound => {
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::Store(e) => {
                error!("store error: {}", e);
                let status = StatusCode::BAD_REQUEST;
                let body = Json(ErrorResponse {
                    error: status.to_string(),
                    message: e.to_string(),
                });
                (status, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_from_store_maps_to_not_found() {
        let err = AppError::from(StoreError::InvalidIdentifier("banana456".to_string()));
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failure_maps_to_bad_request() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::from(InvalidField::MissingText);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
