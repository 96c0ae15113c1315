use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::responses::*;
use crate::models::{Order, OrderRequest, OrderType};

/// OpenAPI v1 specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trade Orders API",
        version = "1.0",
        description = "A simple API for managing trade orders"
    ),
    paths(
        handlers::health_check,
        handlers::create_order,
        handlers::list_orders,
    ),
    components(
        schemas(
            Order,
            OrderType,
            OrderRequest,
            ErrorResponse,
            FieldError,
            ValidationErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "orders", description = "Trade order endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_order_paths() {
        let doc = ApiDoc::openapi();

        assert_eq!(doc.info.title, "Trade Orders API");
        assert!(doc.paths.paths.contains_key("/api/v1/orders"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
