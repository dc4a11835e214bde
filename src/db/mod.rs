//! Database layer
//!
//! Local SQLite storage for:
//! - Organizations
//! - Working hours and date overrides
//! - Booking settings

pub mod booking_settings_repository;
pub mod organization_repository;
pub mod working_hours_repository;

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::config::DatabaseConfig;

pub use booking_settings_repository::BookingSettingsRepository;
pub use organization_repository::OrganizationRepository;
pub use working_hours_repository::WorkingHoursRepository;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Check that the database answers queries
pub async fn check_health(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Whether an error (possibly wrapped in context) is a unique constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
    )
}

/// Parse a timestamp column written by this crate (RFC 3339) or by SQLite
/// defaults ("YYYY-MM-DD HH:MM:SS")
pub(crate) fn parse_db_timestamp(ts: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
    }
    Utc::now()
}
