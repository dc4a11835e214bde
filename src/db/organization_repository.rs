//! Organization (tenant) repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_db_timestamp;
use crate::models::{CreateOrganizationRequest, Organization};

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: String,
    name: String,
    slug: String,
    created_at: String,
    updated_at: String,
}

pub struct OrganizationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrganizationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM organizations
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list organizations")?;

        Ok(rows.into_iter().filter_map(row_to_org).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get organization")?;

        Ok(row.and_then(row_to_org))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await
            .context("Failed to look up organization")?;

        Ok(found.is_some())
    }

    pub async fn create(&self, req: &CreateOrganizationRequest) -> Result<Organization> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create organization")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created organization")
    }

    /// Delete an organization; its working hours and settings cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete organization")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_org(row: OrganizationRow) -> Option<Organization> {
    let id = match Uuid::parse_str(&row.id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Skipping organization with invalid id {}: {}", row.id, e);
            return None;
        }
    };

    Some(Organization {
        id,
        name: row.name,
        slug: row.slug,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    })
}
