pub mod handlers;
mod jwt;
pub mod models;
mod password;
mod service;

// Re-export handlers for route registration
pub use handlers::{login, logout, me, refresh, register};

// Re-export for the extractor and for tests that need to mint tokens
pub use jwt::{create_access_token, decode_token, extract_token};
pub use models::User;
