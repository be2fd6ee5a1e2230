pub mod auth;

pub use auth::{Claims, create_token, verify_token};
