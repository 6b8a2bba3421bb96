pub mod auth;
pub mod cors;

pub use auth::{Access, AccessPolicy, AuthMiddleware, AuthUser};
pub use cors::create_cors;
