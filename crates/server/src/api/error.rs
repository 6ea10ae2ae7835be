//! Error responses shared by the API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use cardcatalog_core::{AdapterError, CatalogError, MtgError, ValidationErrors};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Field-level messages, present on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// An error status with its JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                errors: None,
            },
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        let error = error.into();
        error!("Request failed: {}", error);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorResponse {
                error: format!("Validation failed: {}", errors),
                errors: Some(errors),
            },
        }
    }

    pub fn not_implemented(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => ApiError::not_found(e.to_string()),
            CatalogError::Validation(errors) => ApiError::validation(errors),
            CatalogError::Database(_) => ApiError::internal(e.to_string()),
        }
    }
}

impl From<MtgError> for ApiError {
    fn from(e: MtgError) -> Self {
        match e {
            MtgError::NotFound(_) => ApiError::not_found(e.to_string()),
            MtgError::Validation(errors) => ApiError::validation(errors),
            MtgError::Database(_) => ApiError::internal(e.to_string()),
        }
    }
}

impl From<AdapterError> for ApiError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::NotImplemented(message) => ApiError::not_implemented(message),
            AdapterError::Store(e) => e.into(),
        }
    }
}
