use super::{BusinessHoursRow, ObservationStore, StatusRow};
use crate::domain::LocationId;
use crate::errors::ApiResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct LocationRecord {
    status_logs: Vec<StatusRow>,
    business_hours: Vec<BusinessHoursRow>,
    timezone: Option<String>,
}

/// In-memory observation store for tests and local development
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    locations: RwLock<BTreeMap<LocationId, LocationRecord>>,
}

impl MemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_status(
        &self,
        location_id: LocationId,
        timestamp_utc: DateTime<Utc>,
        status: impl Into<String>,
    ) {
        self.locations
            .write()
            .entry(location_id)
            .or_default()
            .status_logs
            .push(StatusRow {
                timestamp_utc,
                status: status.into(),
            });
    }

    pub fn add_business_hours(
        &self,
        location_id: LocationId,
        day: i32,
        start_time_local: NaiveTime,
        end_time_local: NaiveTime,
    ) {
        self.locations
            .write()
            .entry(location_id)
            .or_default()
            .business_hours
            .push(BusinessHoursRow {
                day,
                start_time_local,
                end_time_local,
            });
    }

    pub fn set_timezone(&self, location_id: LocationId, timezone: impl Into<String>) {
        self.locations
            .write()
            .entry(location_id)
            .or_default()
            .timezone = Some(timezone.into());
    }
}

#[async_trait]
impl ObservationStore for MemoryObservationStore {
    async fn list_location_ids(&self) -> ApiResult<Vec<LocationId>> {
        Ok(self
            .locations
            .read()
            .iter()
            .filter(|(_, record)| !record.status_logs.is_empty())
            .map(|(id, _)| *id)
            .collect())
    }

    async fn status_logs(&self, location_id: LocationId) -> ApiResult<Vec<StatusRow>> {
        let mut rows = self
            .locations
            .read()
            .get(&location_id)
            .map(|record| record.status_logs.clone())
            .unwrap_or_default();
        rows.sort_by_key(|row| row.timestamp_utc);
        Ok(rows)
    }

    async fn business_hours(&self, location_id: LocationId) -> ApiResult<Vec<BusinessHoursRow>> {
        Ok(self
            .locations
            .read()
            .get(&location_id)
            .map(|record| record.business_hours.clone())
            .unwrap_or_default())
    }

    async fn timezone(&self, location_id: LocationId) -> ApiResult<Option<String>> {
        Ok(self
            .locations
            .read()
            .get(&location_id)
            .and_then(|record| record.timezone.clone()))
    }
}
