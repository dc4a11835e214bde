//! Working hours API endpoints
//!
//! Weekly schedule, per-date overrides and a resolved-day preview for one
//! organization.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::organizations::require_organization;
use crate::{
    db::{is_unique_violation, WorkingHoursRepository},
    models::{
        CreateOverrideRequest, DateOverride, ResolvedDay, UpdateWorkingHoursRequest,
        WorkingHoursConfig,
    },
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/working-hours",
            get(get_working_hours).put(update_working_hours),
        )
        .route("/{id}/working-hours/overrides", post(create_override))
        .route(
            "/{id}/working-hours/overrides/{override_id}",
            delete(delete_override),
        )
        .route("/{id}/working-hours/days/{date}", get(preview_day))
}

/// Resolved hours of one date, as the booking form would see them
#[derive(Debug, Serialize)]
pub struct DayPreview {
    /// When false the organization accepts bookings at any time
    pub enabled: bool,
    #[serde(flatten)]
    pub day: ResolvedDay,
}

async fn load_config(
    state: &AppState,
    organization_id: Uuid,
) -> Result<WorkingHoursConfig, AppError> {
    WorkingHoursRepository::new(&state.db)
        .get_config(organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get working hours: {}", e);
            AppError::internal("Failed to get working hours")
        })
}

async fn get_working_hours(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkingHoursConfig>, AppError> {
    let organization_id = require_organization(&state, &id).await?;
    Ok(Json(load_config(&state, organization_id).await?))
}

async fn update_working_hours(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<WorkingHoursConfig>, AppError> {
    let organization_id = require_organization(&state, &id).await?;

    if let Some(ref schedule) = payload.weekly_schedule {
        schedule.validate()?;
    }

    let current = load_config(&state, organization_id).await?;
    let enabled = payload.enabled.unwrap_or(current.enabled);
    let schedule = payload
        .weekly_schedule
        .unwrap_or(current.weekly_schedule);

    WorkingHoursRepository::new(&state.db)
        .save(organization_id, enabled, &schedule)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save working hours: {}", e);
            AppError::internal("Failed to save working hours")
        })?;

    tracing::info!(
        organization_id = %organization_id,
        enabled = enabled,
        "Working hours updated"
    );

    Ok(Json(load_config(&state, organization_id).await?))
}

async fn create_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateOverrideRequest>,
) -> Result<(StatusCode, Json<DateOverride>), AppError> {
    let organization_id = require_organization(&state, &id).await?;

    payload.validate()?;
    if payload.date < Utc::now().date_naive() {
        return Err(AppError::bad_request(
            "Cannot create an override for a past date",
        ));
    }

    let date_override = payload.into_override();
    date_override.validate()?;

    WorkingHoursRepository::new(&state.db)
        .create_override(organization_id, &date_override)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!(
                    "An override already exists for {}",
                    date_override.date
                ))
            } else {
                tracing::error!("Failed to create working hours override: {}", e);
                AppError::internal("Failed to create working hours override")
            }
        })?;

    tracing::info!(
        organization_id = %organization_id,
        date = %date_override.date,
        is_open = date_override.is_open,
        "Working hours override created"
    );

    Ok((StatusCode::CREATED, Json(date_override)))
}

async fn delete_override(
    State(state): State<AppState>,
    Path((id, override_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let organization_id = require_organization(&state, &id).await?;
    let override_id = Uuid::parse_str(&override_id)
        .map_err(|_| AppError::bad_request("Invalid override ID"))?;

    let deleted = WorkingHoursRepository::new(&state.db)
        .delete_override(organization_id, override_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete working hours override: {}", e);
            AppError::internal("Failed to delete working hours override")
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Override not found"))
    }
}

async fn preview_day(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
) -> Result<Json<DayPreview>, AppError> {
    let organization_id = require_organization(&state, &id).await?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("Invalid date, expected YYYY-MM-DD"))?;

    let config = load_config(&state, organization_id).await?;

    Ok(Json(DayPreview {
        enabled: config.enabled,
        day: config.resolve(date),
    }))
}
