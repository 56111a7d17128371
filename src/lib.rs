pub mod ai;
pub mod auth;
pub mod budget;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod goal;
pub mod models;
pub mod openapi;
pub mod period;
pub mod reconciliation;
pub mod routes;
pub mod store;
pub mod summary;
pub mod transaction;
