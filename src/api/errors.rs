use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::database::DatabaseError;

use super::responses::{ErrorResponse, FieldError, ValidationErrorResponse};
use super::validation::RequestError;

/// Errors returned by the order handlers
///
/// Client errors carry their details into the 400 body. Persistence errors
/// are logged here and replaced by a fixed message, so driver text never
/// reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Failed to create order: {0}")]
    CreateFailed(DatabaseError),

    #[error("Failed to fetch orders: {0}")]
    FetchFailed(DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::CreateFailed(_) | ApiError::FetchFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Malformed(e) => ApiError::MalformedBody(e.to_string()),
            RequestError::Invalid(errors) => ApiError::Validation(errors),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::MalformedBody(reason) => {
                tracing::debug!("Rejected malformed order body: {}", reason);
                (status, Json(ValidationErrorResponse::malformed())).into_response()
            }
            ApiError::Validation(errors) => {
                tracing::debug!("Rejected order with {} invalid field(s)", errors.len());
                (status, Json(ValidationErrorResponse::from_errors(errors))).into_response()
            }
            ApiError::CreateFailed(e) => {
                tracing::error!("Failed to create order: {}", e);
                (status, Json(ErrorResponse::new("Failed to create order"))).into_response()
            }
            ApiError::FetchFailed(e) => {
                tracing::error!("Failed to fetch orders: {}", e);
                (status, Json(ErrorResponse::new("Failed to fetch orders"))).into_response()
            }
        }
    }
}
