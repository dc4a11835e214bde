//! Booking window validation endpoint
//!
//! A rejected booking is a verdict, not an HTTP error: the response is 200
//! with `valid: false` and the list of violations.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::organizations::require_organization;
use crate::{
    models::{RawBookingWindow, ValidationVerdict, Violation},
    services::BookingWindowService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}/bookings/validate", post(validate_booking))
}

#[derive(Debug, Serialize)]
pub struct ValidateBookingResponse {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub messages: Vec<String>,
}

impl From<ValidationVerdict> for ValidateBookingResponse {
    fn from(verdict: ValidationVerdict) -> Self {
        let messages = verdict.messages();
        Self {
            valid: verdict.valid,
            violations: verdict.violations,
            messages,
        }
    }
}

async fn validate_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RawBookingWindow>,
) -> Result<Json<ValidateBookingResponse>, AppError> {
    let organization_id = require_organization(&state, &id).await?;

    let verdict = BookingWindowService::new(state.db.clone())
        .validate(organization_id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to validate booking window: {}", e);
            AppError::internal("Failed to validate booking window")
        })?;

    Ok(Json(verdict.into()))
}
