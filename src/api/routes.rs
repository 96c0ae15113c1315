use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::cors::cors;
use super::handlers::*;
use super::openapi::ApiDoc;

/// Create the API router with Swagger UI and CORS applied to every route
pub fn create_router(repository: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health check
        .route("/health", get(health_check))
        // Order endpoints
        .route("/api/v1/orders", post(create_order).get(list_orders))
        .with_state(repository)
        .layer(middleware::from_fn(cors))
}
