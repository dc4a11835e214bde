//! Booking Window Library
//!
//! Working hours, booking policy and booking window validation for
//! multi-tenant resource booking, plus the HTTP and storage adapters that
//! serve them.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use services::{evaluate, evaluate_raw, BookingWindowService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
}
