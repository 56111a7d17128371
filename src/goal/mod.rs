pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for route registration
pub use handlers::{create_goal, delete_goal, list_goals, update_goal};
