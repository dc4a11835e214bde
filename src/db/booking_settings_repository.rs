//! Booking settings repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::BookingPolicy;

#[derive(Debug, sqlx::FromRow)]
struct BookingSettingsRow {
    buffer_start_time: i64,
    max_booking_length: Option<i64>,
    max_booking_length_skip_closed_days: bool,
    tags_required: bool,
}

pub struct BookingSettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookingSettingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, organization_id: Uuid) -> Result<Option<BookingPolicy>> {
        let row = sqlx::query_as::<_, BookingSettingsRow>(
            r#"
            SELECT buffer_start_time, max_booking_length,
                   max_booking_length_skip_closed_days, tags_required
            FROM booking_settings
            WHERE organization_id = ?
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get booking settings")?;

        Ok(row.map(row_to_policy))
    }

    pub async fn upsert(&self, organization_id: Uuid, policy: &BookingPolicy) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO booking_settings
                (organization_id, buffer_start_time, max_booking_length,
                 max_booking_length_skip_closed_days, tags_required, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(organization_id) DO UPDATE SET
                buffer_start_time = excluded.buffer_start_time,
                max_booking_length = excluded.max_booking_length,
                max_booking_length_skip_closed_days = excluded.max_booking_length_skip_closed_days,
                tags_required = excluded.tags_required,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(organization_id.to_string())
        .bind(i64::from(policy.buffer_start_time))
        .bind(policy.max_booking_length.map(i64::from))
        .bind(policy.max_booking_length_skip_closed_days)
        .bind(policy.tags_required)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to save booking settings")?;

        Ok(())
    }
}

fn row_to_policy(row: BookingSettingsRow) -> BookingPolicy {
    BookingPolicy {
        // Out of range values only come from manual edits; clamp them
        buffer_start_time: u32::try_from(row.buffer_start_time.max(0)).unwrap_or(u32::MAX),
        max_booking_length: row
            .max_booking_length
            .map(|hours| u32::try_from(hours.max(1)).unwrap_or(u32::MAX)),
        max_booking_length_skip_closed_days: row.max_booking_length_skip_closed_days,
        tags_required: row.tags_required,
    }
}
