/// Domain models for the application
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store identifier as kept in the observation tables
pub type LocationId = i64;

/// Observed status of a location at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::Inactive => f.write_str("inactive"),
        }
    }
}

/// One status poll for a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusObservation {
    pub location_id: LocationId,
    pub timestamp_utc: DateTime<Utc>,
    pub status: Status,
}

/// Weekly opening interval in the location's wall-clock time.
///
/// `day_of_week` counts from Monday (0) to Sunday (6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHoursInterval {
    pub location_id: LocationId,
    pub day_of_week: u32,
    pub start_time_local: NaiveTime,
    pub end_time_local: NaiveTime,
}

impl BusinessHoursInterval {
    /// Whether a local weekday and wall-clock time fall inside the interval,
    /// bounds included. An interval whose end precedes its start wraps past
    /// midnight; the part after midnight belongs to the following weekday.
    pub fn covers(&self, day_of_week: u32, time: NaiveTime) -> bool {
        if self.start_time_local <= self.end_time_local {
            return day_of_week == self.day_of_week
                && time >= self.start_time_local
                && time <= self.end_time_local;
        }
        (day_of_week == self.day_of_week && time >= self.start_time_local)
            || (day_of_week == (self.day_of_week + 1) % 7 && time <= self.end_time_local)
    }
}

/// Uptime/downtime sample counts for one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub location_id: LocationId,
    pub uptime_last_hour: u32,
    pub uptime_last_day: u32,
    pub uptime_last_week: u32,
    pub downtime_last_hour: u32,
    pub downtime_last_day: u32,
    pub downtime_last_week: u32,
}

/// A location whose estimate could not be produced for a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFailure {
    pub location_id: LocationId,
    pub reason: String,
}

/// Poll outcome for a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum ReportStatus {
    Running,
    Complete {
        data: Vec<ActivityReport>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        failed: Vec<LocationFailure>,
    },
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
