use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic error body for server-side failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Failed to create order")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "price")]
    pub field: String,
    #[schema(example = "price must be greater than 0")]
    pub message: String,
}

/// Body of every 400 response
///
/// `errors` lists one entry per violated field. It is empty when the body
/// could not be decoded at all, in which case `message` says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "malformed request body")]
    pub message: Option<String>,
}

impl ValidationErrorResponse {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            message: None,
        }
    }

    pub fn malformed() -> Self {
        Self {
            errors: Vec::new(),
            message: Some("malformed request body".to_string()),
        }
    }
}

/// Liveness probe body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: String,
}
