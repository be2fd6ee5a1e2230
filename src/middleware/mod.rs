pub mod auth;

pub use auth::{get_identity, Identity};
