pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, get_current_user};
pub use cors::create_cors;
