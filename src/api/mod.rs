pub mod cors;
pub mod errors;
pub mod handlers;
pub mod openapi;
pub mod responses;
pub mod routes;
pub mod validation;

pub use errors::ApiError;
pub use handlers::*;
pub use openapi::*;
pub use responses::*;
pub use routes::create_router;
