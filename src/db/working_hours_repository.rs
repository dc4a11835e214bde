//! Working hours repository
//!
//! Reads are lenient: a stored schedule that no longer decodes reads as
//! fully closed and an override with an unreadable date is skipped, both
//! with a warning. Writes are expected to be validated by the caller.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::models::{DateOverride, WeeklySchedule, WorkingHoursConfig};

#[derive(Debug, sqlx::FromRow)]
struct WorkingHoursRow {
    enabled: bool,
    weekly_schedule: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OverrideRow {
    id: String,
    date: String,
    is_open: bool,
    open_time: Option<String>,
    close_time: Option<String>,
    reason: Option<String>,
}

pub struct WorkingHoursRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WorkingHoursRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Working hours plus overrides; defaults when nothing was saved yet
    pub async fn get_config(&self, organization_id: Uuid) -> Result<WorkingHoursConfig> {
        let row = sqlx::query_as::<_, WorkingHoursRow>(
            r#"
            SELECT enabled, weekly_schedule
            FROM working_hours
            WHERE organization_id = ?
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get working hours")?;

        let mut config = match row {
            Some(row) => WorkingHoursConfig::new(
                row.enabled,
                decode_schedule(organization_id, &row.weekly_schedule),
            ),
            None => WorkingHoursConfig::default(),
        };
        config.overrides = self.list_overrides(organization_id).await?;

        Ok(config)
    }

    /// Insert or replace the enabled flag and weekly schedule
    pub async fn save(
        &self,
        organization_id: Uuid,
        enabled: bool,
        schedule: &WeeklySchedule,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let schedule_json =
            serde_json::to_string(schedule).context("Failed to encode weekly schedule")?;

        sqlx::query(
            r#"
            INSERT INTO working_hours
                (organization_id, enabled, weekly_schedule, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(organization_id) DO UPDATE SET
                enabled = excluded.enabled,
                weekly_schedule = excluded.weekly_schedule,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(organization_id.to_string())
        .bind(enabled)
        .bind(&schedule_json)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to save working hours")?;

        Ok(())
    }

    /// Overrides ordered by date
    pub async fn list_overrides(&self, organization_id: Uuid) -> Result<Vec<DateOverride>> {
        let rows = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT id, date, is_open, open_time, close_time, reason
            FROM working_hours_overrides
            WHERE organization_id = ?
            ORDER BY date
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list working hours overrides")?;

        Ok(rows.into_iter().filter_map(row_to_override).collect())
    }

    /// Store a new override. Fails with a unique violation when the
    /// organization already has an override for that date.
    pub async fn create_override(
        &self,
        organization_id: Uuid,
        date_override: &DateOverride,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO working_hours_overrides
                (id, organization_id, date, is_open, open_time, close_time, reason,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(date_override.id.to_string())
        .bind(organization_id.to_string())
        .bind(date_override.date.format("%Y-%m-%d").to_string())
        .bind(date_override.is_open)
        .bind(&date_override.open_time)
        .bind(&date_override.close_time)
        .bind(&date_override.reason)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create working hours override")?;

        Ok(())
    }

    pub async fn delete_override(&self, organization_id: Uuid, override_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM working_hours_overrides WHERE organization_id = ? AND id = ?",
        )
        .bind(organization_id.to_string())
        .bind(override_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete working hours override")?;

        Ok(result.rows_affected() > 0)
    }
}

fn decode_schedule(organization_id: Uuid, raw: &str) -> WeeklySchedule {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(
            organization_id = %organization_id,
            error = %e,
            "Stored weekly schedule is unreadable, treating every day as closed"
        );
        WeeklySchedule::closed()
    })
}

fn row_to_override(row: OverrideRow) -> Option<DateOverride> {
    let date = match NaiveDate::parse_from_str(&row.date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            warn!("Skipping override {} with invalid date {}: {}", row.id, row.date, e);
            return None;
        }
    };

    Some(DateOverride {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        date,
        is_open: row.is_open,
        open_time: row.open_time,
        close_time: row.close_time,
        reason: row.reason,
    })
}
