//! Booking settings API endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use super::organizations::require_organization;
use crate::{
    db::BookingSettingsRepository,
    models::{BookingPolicy, UpdateBookingSettingsRequest},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/{id}/booking-settings",
        get(get_booking_settings).put(update_booking_settings),
    )
}

async fn get_booking_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingPolicy>, AppError> {
    let organization_id = require_organization(&state, &id).await?;

    let policy = BookingSettingsRepository::new(&state.db)
        .get(organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get booking settings: {}", e);
            AppError::internal("Failed to get booking settings")
        })?
        .unwrap_or_default();

    Ok(Json(policy))
}

async fn update_booking_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookingSettingsRequest>,
) -> Result<Json<BookingPolicy>, AppError> {
    let organization_id = require_organization(&state, &id).await?;
    payload.validate()?;

    let policy = BookingPolicy::from(payload);
    BookingSettingsRepository::new(&state.db)
        .upsert(organization_id, &policy)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save booking settings: {}", e);
            AppError::internal("Failed to save booking settings")
        })?;

    tracing::info!(
        organization_id = %organization_id,
        buffer_start_time = policy.buffer_start_time,
        max_booking_length = ?policy.max_booking_length,
        "Booking settings updated"
    );

    Ok(Json(policy))
}
