use super::{BusinessHoursRow, ObservationStore, StatusRow};
use crate::domain::LocationId;
use crate::errors::ApiResult;
use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime};
use sqlx::PgPool;

/// Observation store backed by the `status_logs`, `restaurants` and
/// `timezones` tables
#[derive(Clone)]
pub struct PgObservationStore {
    pool: PgPool,
}

impl PgObservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationStore for PgObservationStore {
    async fn list_location_ids(&self) -> ApiResult<Vec<LocationId>> {
        let rows = sqlx::query_as::<_, (i64,)>(
            "SELECT DISTINCT store_id FROM status_logs ORDER BY store_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn status_logs(&self, location_id: LocationId) -> ApiResult<Vec<StatusRow>> {
        let rows = sqlx::query_as::<_, (NaiveDateTime, String)>(
            "SELECT timestamp_utc, status
             FROM status_logs
             WHERE store_id = $1
             ORDER BY timestamp_utc ASC",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(ts, status)| StatusRow {
                timestamp_utc: ts.and_utc(),
                status,
            })
            .collect())
    }

    async fn business_hours(&self, location_id: LocationId) -> ApiResult<Vec<BusinessHoursRow>> {
        let rows = sqlx::query_as::<_, (i32, NaiveTime, NaiveTime)>(
            "SELECT day, start_time_local, end_time_local
             FROM restaurants
             WHERE store_id = $1",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, start_time_local, end_time_local)| BusinessHoursRow {
                day,
                start_time_local,
                end_time_local,
            })
            .collect())
    }

    async fn timezone(&self, location_id: LocationId) -> ApiResult<Option<String>> {
        let row = sqlx::query_as::<_, (String,)>(
            "SELECT timezone_str FROM timezones WHERE store_id = $1 LIMIT 1",
        )
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(tz,)| tz))
    }
}

/// Initialize database tables
pub async fn init_db(pool: &PgPool) -> ApiResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS status_logs(
            store_id BIGINT NOT NULL,
            status TEXT NOT NULL,
            timestamp_utc TIMESTAMP NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS ix_status_logs_store_ts
         ON status_logs(store_id, timestamp_utc)",
    )
    .execute(pool)
    .await?;

    // Weekly business hours, day 0 = Monday
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS restaurants(
            store_id BIGINT NOT NULL,
            day INT NOT NULL,
            start_time_local TIME NOT NULL,
            end_time_local TIME NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS timezones(
            store_id BIGINT NOT NULL,
            timezone_str TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
