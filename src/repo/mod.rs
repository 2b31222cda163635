/// Repository layer for observation reads
use crate::domain::LocationId;
use crate::errors::ApiResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};

mod memory;
mod postgres;

pub use memory::MemoryObservationStore;
pub use postgres::{init_db, PgObservationStore};

/// Raw status poll as stored; `status` is validated by the estimator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub timestamp_utc: DateTime<Utc>,
    pub status: String,
}

/// Raw business-hours row as stored; `day` is validated by the estimator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHoursRow {
    pub day: i32,
    pub start_time_local: NaiveTime,
    pub end_time_local: NaiveTime,
}

/// Read-only queries the report pipeline needs from the observation tables.
///
/// Implementations must be `Send + Sync` so one store can be shared by every
/// estimation task of a report.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Distinct location ids that have at least one status row, ascending
    async fn list_location_ids(&self) -> ApiResult<Vec<LocationId>>;

    /// Status rows for a location ordered by `timestamp_utc` ascending
    async fn status_logs(&self, location_id: LocationId) -> ApiResult<Vec<StatusRow>>;

    async fn business_hours(&self, location_id: LocationId) -> ApiResult<Vec<BusinessHoursRow>>;

    /// IANA timezone name, if one is assigned
    async fn timezone(&self, location_id: LocationId) -> ApiResult<Option<String>>;
}
