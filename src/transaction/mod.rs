pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for route registration
pub use handlers::{
    create_transaction, delete_transaction, get_summary, get_transaction, list_transactions,
    update_transaction,
};
