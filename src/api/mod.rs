//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod booking_settings;
mod bookings;
mod health;
mod organizations;
mod working_hours;

pub use health::*;

/// Create the full API router (mounted under `/api/v1`)
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        // Organizations and their per-tenant settings
        .nest(
            "/organizations",
            organizations::routes()
                .merge(working_hours::routes())
                .merge(booking_settings::routes())
                .merge(bookings::routes()),
        )
}
