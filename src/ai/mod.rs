//! Pass-through proxy to the external AI analysis service.

pub mod client;
pub mod handlers;

pub use client::{AiClient, AiEndpoint};

// Re-export handlers for route registration
pub use handlers::{savings_recommendations, spending_insights, spending_prediction};
