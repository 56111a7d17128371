pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for route registration
pub use handlers::{
    create_budget, delete_budget, get_budget, get_monthly_budgets, list_budgets, update_budget,
};
