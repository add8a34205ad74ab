pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser, UNAUTHORIZED_MESSAGE};
pub use cors::{cors_layer, origin_guard};
pub use response::{ApiResponse, ApiResult};
