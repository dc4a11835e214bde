//! Organization (tenant) API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{is_unique_violation, OrganizationRepository},
    models::{CreateOrganizationRequest, Organization},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/{id}", get(get_organization).delete(delete_organization))
}

/// Parse an organization id from the path
pub(super) fn parse_organization_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid organization ID"))
}

/// Parse an organization id and make sure the organization exists
pub(super) async fn require_organization(state: &AppState, id: &str) -> Result<Uuid, AppError> {
    let uuid = parse_organization_id(id)?;

    let exists = OrganizationRepository::new(&state.db)
        .exists(uuid)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up organization: {}", e);
            AppError::internal("Failed to look up organization")
        })?;

    if exists {
        Ok(uuid)
    } else {
        Err(AppError::not_found("Organization not found"))
    }
}

async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organization>>, AppError> {
    let repo = OrganizationRepository::new(&state.db);
    let orgs = repo.list().await.map_err(|e| {
        tracing::error!("Failed to list organizations: {}", e);
        AppError::internal("Failed to list organizations")
    })?;

    Ok(Json(orgs))
}

async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Organization>, AppError> {
    let uuid = parse_organization_id(&id)?;

    let repo = OrganizationRepository::new(&state.db);
    let org = repo.get_by_id(uuid).await.map_err(|e| {
        tracing::error!("Failed to get organization: {}", e);
        AppError::internal("Failed to get organization")
    })?;

    match org {
        Some(o) => Ok(Json(o)),
        None => Err(AppError::not_found("Organization not found")),
    }
}

async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    payload.validate()?;

    let repo = OrganizationRepository::new(&state.db);
    let org = repo.create(&payload).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict("Organization name/slug already exists")
        } else {
            tracing::error!("Failed to create organization: {}", e);
            AppError::internal("Failed to create organization")
        }
    })?;

    tracing::info!(organization_id = %org.id, slug = %org.slug, "Organization created");

    Ok((StatusCode::CREATED, Json(org)))
}

async fn delete_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_organization_id(&id)?;

    let repo = OrganizationRepository::new(&state.db);
    let deleted = repo.delete(uuid).await.map_err(|e| {
        tracing::error!("Failed to delete organization: {}", e);
        AppError::internal("Failed to delete organization")
    })?;

    if deleted {
        tracing::info!(organization_id = %uuid, "Organization deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Organization not found"))
    }
}
