//! # API Errors
//!
//! The single place where failures from every layer become HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::filter::FilterError;
use crate::observability::{log_event_with_fields, Event};
use crate::pagination::PageError;
use crate::serializer::ValidationErrors;
use crate::store::StoreError;

/// Result type for resource operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent in place of internal fault details
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No record with this id (or not visible to the caller)
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// Payload failed field or relation checks
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Primary key already taken
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("{0}")]
    InvalidFilter(#[from] FilterError),

    #[error("{0}")]
    InvalidPage(#[from] PageError),

    /// Body is not parseable JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Auth(#[from] AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Detail is logged, never sent
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateKey { .. } => StatusCode::CONFLICT,
            ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidPage(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(auth_err) => StatusCode::from_u16(auth_err.status_code())
                .unwrap_or(StatusCode::UNAUTHORIZED),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ApiError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Message safe to show the client
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            ApiError::Auth(err) if !err.is_client_error() => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => ApiError::NotFound { entity, key },
            StoreError::DuplicateKey { entity, key } => ApiError::DuplicateKey { entity, key },
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::Poisoned => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            let detail = self.to_string();
            log_event_with_fields(Event::InternalFault, &[("detail", detail.as_str())]);
        }

        match &self {
            ApiError::Validation(errors) => {
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            other => (status, Json(ErrorResponse::from(other))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::not_found("Blog", 3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DuplicateKey {
                entity: "Employee",
                key: "E1".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(FilterError::SearchUnsupported).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PageError::InvalidPage("0".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::AuthenticationRequired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_store_errors_map_across() {
        assert!(matches!(
            ApiError::from(StoreError::not_found("Blog", 1)),
            ApiError::NotFound { entity: "Blog", .. }
        ));
        let poisoned = ApiError::from(StoreError::Poisoned);
        assert_eq!(poisoned.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Internal("lock poisoned at table.rs".to_string());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(ErrorResponse::from(&err).code, 500);
    }
}
