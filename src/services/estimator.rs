//! Uptime/downtime estimation for a single location.
//!
//! Sparse status polls are resampled onto a regular grid per trailing window
//! (nearest observation wins, ties go to the earlier one) and the grid points
//! are counted per status.

use crate::domain::{ActivityReport, BusinessHoursInterval, LocationId, Status, StatusObservation};
use crate::errors::{ApiError, ApiResult};
use crate::repo::{BusinessHoursRow, ObservationStore, StatusRow};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, warn};

/// Trailing windows reported for every location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    LastHour,
    LastDay,
    LastWeek,
}

impl ReportWindow {
    pub const ALL: [ReportWindow; 3] = [
        ReportWindow::LastHour,
        ReportWindow::LastDay,
        ReportWindow::LastWeek,
    ];

    /// Distance from the first grid point to the reference instant
    pub fn span(self) -> Duration {
        match self {
            ReportWindow::LastHour => Duration::minutes(59),
            ReportWindow::LastDay => Duration::hours(23),
            ReportWindow::LastWeek => Duration::hours(167),
        }
    }

    pub fn step(self) -> Duration {
        match self {
            ReportWindow::LastHour => Duration::minutes(1),
            ReportWindow::LastDay | ReportWindow::LastWeek => Duration::hours(1),
        }
    }

    /// Number of grid points, both ends included
    pub fn grid_size(self) -> u32 {
        match self {
            ReportWindow::LastHour => 60,
            ReportWindow::LastDay => 24,
            ReportWindow::LastWeek => 168,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts {
    pub uptime: u32,
    pub downtime: u32,
}

impl WindowCounts {
    fn add(&mut self, status: Status, samples: u32) {
        match status {
            Status::Active => self.uptime += samples,
            Status::Inactive => self.downtime += samples,
        }
    }
}

/// Everything the estimator reads for one location
#[derive(Debug, Clone)]
pub struct LocationSnapshot {
    pub location_id: LocationId,
    /// Ascending by `timestamp_utc`
    pub observations: Vec<StatusObservation>,
    pub business_hours: Vec<BusinessHoursInterval>,
    pub timezone: Tz,
}

/// Business-hours context of one observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleContext {
    pub day_of_week: u32,
    /// Interval whose start is nearest in wall-clock time on the same weekday
    pub nearest_interval: Option<BusinessHoursInterval>,
    /// Whether any interval covers the observation, including the
    /// after-midnight part of the previous weekday's overnight intervals
    pub within_hours: bool,
}

/// Seven full-day intervals used when a location has no schedule
pub fn always_open(location_id: LocationId) -> Vec<BusinessHoursInterval> {
    let open = NaiveTime::MIN;
    let close = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    (0..7)
        .map(|day_of_week| BusinessHoursInterval {
            location_id,
            day_of_week,
            start_time_local: open,
            end_time_local: close,
        })
        .collect()
}

/// Map a wall-clock datetime to the zone; DST gaps shift forward an hour.
fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Index of the sorted start nearest to `at`, ties to the earlier start
fn nearest_start(starts: &[DateTime<Tz>], at: &DateTime<Tz>) -> Option<usize> {
    let idx = starts.partition_point(|s| s < at);
    let before = idx.checked_sub(1);
    let after = (idx < starts.len()).then_some(idx);
    match (before, after) {
        (Some(b), Some(a)) => {
            if at.signed_duration_since(starts[b]) <= starts[a].signed_duration_since(at) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, a) => a,
    }
}

/// Associate each observation with the business-hours interval of its local
/// weekday whose start is nearest, comparing wall-clock times anchored to the
/// reference instant's local date.
pub fn associate_schedule(
    snapshot: &LocationSnapshot,
    reference: DateTime<Utc>,
) -> Vec<ScheduleContext> {
    let tz = snapshot.timezone;
    let anchor: NaiveDate = reference.with_timezone(&tz).date_naive();

    let synthesized;
    let intervals = if snapshot.business_hours.is_empty() {
        synthesized = always_open(snapshot.location_id);
        &synthesized
    } else {
        &snapshot.business_hours
    };

    // Per weekday: intervals sorted by anchored start
    let mut by_day: Vec<Vec<(DateTime<Tz>, &BusinessHoursInterval)>> = vec![Vec::new(); 7];
    for interval in intervals {
        if let Some(slots) = by_day.get_mut(interval.day_of_week as usize) {
            let start = resolve_local(&tz, anchor.and_time(interval.start_time_local));
            slots.push((start, interval));
        }
    }
    for slots in &mut by_day {
        slots.sort_by_key(|(start, _)| *start);
    }
    let starts: Vec<Vec<DateTime<Tz>>> = by_day
        .iter()
        .map(|slots| slots.iter().map(|(start, _)| *start).collect())
        .collect();

    snapshot
        .observations
        .iter()
        .map(|obs| {
            let local = obs.timestamp_utc.with_timezone(&tz);
            let day = local.weekday().num_days_from_monday();
            let time = local.time();
            let slots = &by_day[day as usize];
            let anchored = resolve_local(&tz, anchor.and_time(time));

            ScheduleContext {
                day_of_week: day,
                nearest_interval: nearest_start(&starts[day as usize], &anchored)
                    .map(|i| slots[i].1.clone()),
                within_hours: intervals.iter().any(|interval| interval.covers(day, time)),
            }
        })
        .collect()
}

/// Resample one window of the timeline and count grid points per status.
///
/// Only observations inside `[window_start, reference]` compete for grid
/// points. A window without any is filled from the last earlier observation,
/// or counted as inactive when there is none.
pub fn resolve_window(
    timeline: &[(DateTime<Utc>, Status)],
    reference: DateTime<Utc>,
    window: ReportWindow,
) -> WindowCounts {
    let start = reference - window.span();
    let lo = timeline.partition_point(|(t, _)| *t < start);
    let hi = timeline.partition_point(|(t, _)| *t <= reference);
    let in_window = &timeline[lo..hi];

    let mut counts = WindowCounts::default();
    if in_window.is_empty() {
        let carried = lo
            .checked_sub(1)
            .map(|i| timeline[i].1)
            .unwrap_or(Status::Inactive);
        counts.add(carried, window.grid_size());
        return counts;
    }

    // Single merge pass: `next` is the first observation at or after the point
    let mut next = 0;
    for k in 0..window.grid_size() {
        let point = start + window.step() * k as i32;
        while next < in_window.len() && in_window[next].0 < point {
            next += 1;
        }
        let status = match (next.checked_sub(1), in_window.get(next)) {
            (Some(b), Some(after)) => {
                let before = &in_window[b];
                if point - before.0 <= after.0 - point {
                    before.1
                } else {
                    after.1
                }
            }
            (Some(b), None) => in_window[b].1,
            (None, Some(after)) => after.1,
            (None, None) => Status::Inactive,
        };
        counts.add(status, 1);
    }
    counts
}

/// Produce the six-metric report for a loaded snapshot.
///
/// With `restrict_to_business_hours` set, observations no interval covers are
/// ignored; overnight intervals cover the early hours of the next weekday.
/// Grid sizes never change.
pub fn estimate_snapshot(
    snapshot: &LocationSnapshot,
    reference: DateTime<Utc>,
    restrict_to_business_hours: bool,
) -> ActivityReport {
    let contexts = associate_schedule(snapshot, reference);
    let out_of_hours = contexts.iter().filter(|c| !c.within_hours).count();
    if out_of_hours > 0 {
        debug!(
            location_id = snapshot.location_id,
            out_of_hours, "observations outside business hours"
        );
    }

    let timeline: Vec<(DateTime<Utc>, Status)> = snapshot
        .observations
        .iter()
        .zip(&contexts)
        .filter(|(_, ctx)| !restrict_to_business_hours || ctx.within_hours)
        .map(|(obs, _)| (obs.timestamp_utc, obs.status))
        .collect();

    let [hour, day, week] = ReportWindow::ALL.map(|w| resolve_window(&timeline, reference, w));

    ActivityReport {
        location_id: snapshot.location_id,
        uptime_last_hour: hour.uptime,
        uptime_last_day: day.uptime,
        uptime_last_week: week.uptime,
        downtime_last_hour: hour.downtime,
        downtime_last_day: day.downtime,
        downtime_last_week: week.downtime,
    }
}

/// Loads a location from the observation store and estimates it
pub struct ActivityEstimator {
    store: Arc<dyn ObservationStore>,
    default_timezone: Tz,
    restrict_to_business_hours: bool,
}

impl ActivityEstimator {
    pub fn new(
        store: Arc<dyn ObservationStore>,
        default_timezone: Tz,
        restrict_to_business_hours: bool,
    ) -> Self {
        Self {
            store,
            default_timezone,
            restrict_to_business_hours,
        }
    }

    /// Read and validate a location's rows; malformed rows are skipped
    pub async fn load(&self, location_id: LocationId) -> ApiResult<LocationSnapshot> {
        let upstream = |e: ApiError| ApiError::UpstreamRead {
            location_id,
            message: e.to_string(),
        };

        let (status_rows, hours_rows, timezone) = tokio::try_join!(
            self.store.status_logs(location_id),
            self.store.business_hours(location_id),
            self.store.timezone(location_id),
        )
        .map_err(upstream)?;

        let mut observations = parse_observations(location_id, status_rows);
        observations.sort_by_key(|obs| obs.timestamp_utc);

        Ok(LocationSnapshot {
            location_id,
            observations,
            business_hours: parse_business_hours(location_id, hours_rows),
            timezone: self.resolve_timezone(location_id, timezone),
        })
    }

    pub async fn estimate(
        &self,
        location_id: LocationId,
        reference: DateTime<Utc>,
    ) -> ApiResult<ActivityReport> {
        let snapshot = self.load(location_id).await?;
        Ok(estimate_snapshot(
            &snapshot,
            reference,
            self.restrict_to_business_hours,
        ))
    }

    fn resolve_timezone(&self, location_id: LocationId, raw: Option<String>) -> Tz {
        match raw {
            Some(name) => name.trim().parse::<Tz>().unwrap_or_else(|_| {
                warn!(location_id, timezone = %name, "unknown timezone, using default");
                self.default_timezone
            }),
            None => self.default_timezone,
        }
    }
}

/// Validate one status row
fn parse_status_row(location_id: LocationId, row: StatusRow) -> ApiResult<StatusObservation> {
    let status = row.status.parse::<Status>().map_err(|reason| {
        ApiError::Validation(format!("status row at {}: {}", row.timestamp_utc, reason))
    })?;
    Ok(StatusObservation {
        location_id,
        timestamp_utc: row.timestamp_utc,
        status,
    })
}

/// Validate one business-hours row; weekdays run 0 (Monday) to 6 (Sunday)
fn parse_hours_row(
    location_id: LocationId,
    row: BusinessHoursRow,
) -> ApiResult<BusinessHoursInterval> {
    match u32::try_from(row.day) {
        Ok(day) if day < 7 => Ok(BusinessHoursInterval {
            location_id,
            day_of_week: day,
            start_time_local: row.start_time_local,
            end_time_local: row.end_time_local,
        }),
        _ => Err(ApiError::Validation(format!(
            "business hours row with day {}",
            row.day
        ))),
    }
}

fn parse_observations(location_id: LocationId, rows: Vec<StatusRow>) -> Vec<StatusObservation> {
    let total = rows.len();
    let observations: Vec<StatusObservation> = rows
        .into_iter()
        .filter_map(|row| match parse_status_row(location_id, row) {
            Ok(obs) => Some(obs),
            Err(e) => {
                debug!(location_id, error = %e, "skipping status row");
                None
            }
        })
        .collect();

    if observations.len() < total {
        warn!(
            location_id,
            skipped = total - observations.len(),
            "skipped malformed status rows"
        );
    }
    observations
}

fn parse_business_hours(
    location_id: LocationId,
    rows: Vec<BusinessHoursRow>,
) -> Vec<BusinessHoursInterval> {
    let total = rows.len();
    let intervals: Vec<BusinessHoursInterval> = rows
        .into_iter()
        .filter_map(|row| match parse_hours_row(location_id, row) {
            Ok(interval) => Some(interval),
            Err(e) => {
                debug!(location_id, error = %e, "skipping business hours row");
                None
            }
        })
        .collect();

    if intervals.len() < total {
        warn!(
            location_id,
            skipped = total - intervals.len(),
            "skipped malformed business hours rows"
        );
    }
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryObservationStore;

    fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, hour, minute, 0).unwrap()
    }

    fn reference() -> DateTime<Utc> {
        utc(25, 14, 4)
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn snapshot(observations: &[(DateTime<Utc>, Status)]) -> LocationSnapshot {
        LocationSnapshot {
            location_id: 1,
            observations: observations
                .iter()
                .map(|(ts, status)| StatusObservation {
                    location_id: 1,
                    timestamp_utc: *ts,
                    status: *status,
                })
                .collect(),
            business_hours: vec![],
            timezone: chrono_tz::UTC,
        }
    }

    fn wednesday(start: NaiveTime, end: NaiveTime) -> BusinessHoursInterval {
        BusinessHoursInterval {
            location_id: 1,
            day_of_week: 2,
            start_time_local: start,
            end_time_local: end,
        }
    }

    #[test]
    fn test_grid_sizes_match_span_and_step() {
        for window in ReportWindow::ALL {
            let points = window.span().num_seconds() / window.step().num_seconds() + 1;
            assert_eq!(points, window.grid_size() as i64);
        }
    }

    #[test]
    fn test_single_observation_covers_every_window() {
        let snap = snapshot(&[(utc(25, 13, 30), Status::Active)]);
        let report = estimate_snapshot(&snap, reference(), false);

        assert_eq!(report.uptime_last_hour, 60);
        assert_eq!(report.downtime_last_hour, 0);
        assert_eq!(report.uptime_last_day, 24);
        assert_eq!(report.uptime_last_week, 168);
    }

    #[test]
    fn test_no_observations_is_all_downtime() {
        let report = estimate_snapshot(&snapshot(&[]), reference(), false);

        assert_eq!(
            report,
            ActivityReport {
                location_id: 1,
                uptime_last_hour: 0,
                uptime_last_day: 0,
                uptime_last_week: 0,
                downtime_last_hour: 60,
                downtime_last_day: 24,
                downtime_last_week: 168,
            }
        );
    }

    #[test]
    fn test_nearest_observation_with_tie_to_earlier() {
        // 13:15 is equidistant from both polls and takes the earlier one
        let snap = snapshot(&[
            (utc(25, 13, 10), Status::Inactive),
            (utc(25, 13, 20), Status::Active),
        ]);
        let counts = resolve_window(&timeline(&snap), reference(), ReportWindow::LastHour);

        assert_eq!(counts.downtime, 11);
        assert_eq!(counts.uptime, 49);
    }

    #[test]
    fn test_empty_window_carries_last_earlier_status() {
        let snap = snapshot(&[(utc(25, 10, 0), Status::Active)]);
        let report = estimate_snapshot(&snap, reference(), false);

        assert_eq!(report.uptime_last_hour, 60);
        assert_eq!(report.uptime_last_day, 24);
    }

    #[test]
    fn test_observations_after_reference_are_ignored() {
        let snap = snapshot(&[(utc(25, 14, 30), Status::Active)]);
        let report = estimate_snapshot(&snap, reference(), false);

        assert_eq!(report.uptime_last_hour, 0);
        assert_eq!(report.downtime_last_hour, 60);
        assert_eq!(report.downtime_last_week, 168);
    }

    #[test]
    fn test_counts_always_fill_the_grid() {
        let snap = snapshot(&[
            (utc(19, 3, 0), Status::Active),
            (utc(22, 8, 45), Status::Inactive),
            (utc(24, 23, 10), Status::Active),
            (utc(25, 13, 7), Status::Inactive),
            (utc(25, 13, 50), Status::Active),
        ]);
        let report = estimate_snapshot(&snap, reference(), false);

        assert_eq!(report.uptime_last_hour + report.downtime_last_hour, 60);
        assert_eq!(report.uptime_last_day + report.downtime_last_day, 24);
        assert_eq!(report.uptime_last_week + report.downtime_last_week, 168);
    }

    #[test]
    fn test_business_hours_gate_drops_out_of_hours_polls() {
        let mut snap = snapshot(&[
            (utc(25, 11, 0), Status::Inactive),
            (utc(25, 13, 30), Status::Active),
        ]);
        snap.business_hours = vec![wednesday(time(9, 0), time(12, 0))];

        let ungated = estimate_snapshot(&snap, reference(), false);
        assert_eq!(ungated.uptime_last_hour, 60);

        let gated = estimate_snapshot(&snap, reference(), true);
        assert_eq!(gated.uptime_last_hour, 0);
        assert_eq!(gated.downtime_last_hour, 60);
    }

    #[test]
    fn test_missing_schedule_is_always_open() {
        let snap = snapshot(&[(utc(25, 3, 0), Status::Active)]);
        let contexts = associate_schedule(&snap, reference());

        assert!(contexts[0].within_hours);
        assert_eq!(
            contexts[0].nearest_interval.as_ref().map(|i| i.start_time_local),
            Some(NaiveTime::MIN)
        );
    }

    #[test]
    fn test_association_tie_prefers_earlier_start() {
        let mut snap = snapshot(&[(utc(25, 11, 0), Status::Active)]);
        snap.business_hours = vec![
            wednesday(time(13, 0), time(17, 0)),
            wednesday(time(9, 0), time(10, 0)),
        ];
        let contexts = associate_schedule(&snap, reference());

        assert_eq!(contexts[0].day_of_week, 2);
        assert_eq!(
            contexts[0].nearest_interval.as_ref().map(|i| i.start_time_local),
            Some(time(9, 0))
        );
        assert!(!contexts[0].within_hours);
    }

    #[test]
    fn test_weekday_uses_local_timezone() {
        // 16:00 UTC Wednesday is 01:00 Thursday in Tokyo
        let mut snap = snapshot(&[(utc(25, 16, 0), Status::Active)]);
        snap.timezone = chrono_tz::Asia::Tokyo;
        snap.business_hours = vec![wednesday(time(0, 0), time(23, 0))];
        let contexts = associate_schedule(&snap, reference());

        assert_eq!(contexts[0].day_of_week, 3);
        assert_eq!(contexts[0].nearest_interval, None);
        assert!(!contexts[0].within_hours);
    }

    #[test]
    fn test_overnight_shift_covers_next_morning() {
        // Monday 22:00 to Tuesday 02:00; 2023-01-30 is a Monday
        let mut snap = snapshot(&[
            (utc(30, 1, 0), Status::Inactive),
            (utc(31, 1, 0), Status::Active),
        ]);
        snap.business_hours = vec![BusinessHoursInterval {
            location_id: 1,
            day_of_week: 0,
            start_time_local: time(22, 0),
            end_time_local: time(2, 0),
        }];
        let reference = utc(31, 1, 30);

        let contexts = associate_schedule(&snap, reference);
        assert_eq!(contexts[0].day_of_week, 0);
        assert!(!contexts[0].within_hours);
        assert_eq!(contexts[1].day_of_week, 1);
        assert!(contexts[1].within_hours);

        let gated = estimate_snapshot(&snap, reference, true);
        assert_eq!(gated.uptime_last_hour, 60);
        assert_eq!(gated.uptime_last_week, 168);

        let ungated = estimate_snapshot(&snap, reference, false);
        assert!(ungated.downtime_last_week > 0);
    }

    #[test]
    fn test_resolve_local_spring_forward_gap() {
        let tz = chrono_tz::America::Chicago;
        let missing = NaiveDate::from_ymd_opt(2023, 3, 12)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&tz, missing);

        assert_eq!(resolved.time(), time(3, 30));
        assert_eq!(
            resolved.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2023, 3, 12, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_resolve_local_fall_back_takes_earlier_offset() {
        let tz = chrono_tz::America::Chicago;
        let repeated = NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let resolved = resolve_local(&tz, repeated);

        // CDT (-05:00) comes before CST
        assert_eq!(
            resolved.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2023, 11, 5, 6, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_association_on_spring_forward_day() {
        // Sunday interval starting inside the skipped hour
        let mut snap = snapshot(&[(
            Utc.with_ymd_and_hms(2023, 3, 12, 8, 45, 0).unwrap(),
            Status::Active,
        )]);
        snap.timezone = chrono_tz::America::Chicago;
        snap.business_hours = vec![BusinessHoursInterval {
            location_id: 1,
            day_of_week: 6,
            start_time_local: time(2, 30),
            end_time_local: time(5, 0),
        }];
        let reference = Utc.with_ymd_and_hms(2023, 3, 12, 9, 0, 0).unwrap();
        let contexts = associate_schedule(&snap, reference);

        assert_eq!(contexts[0].day_of_week, 6);
        assert!(contexts[0].within_hours);
        assert_eq!(
            contexts[0].nearest_interval.as_ref().map(|i| i.start_time_local),
            Some(time(2, 30))
        );
    }

    #[test]
    fn test_row_validation_reports_invalid_input() {
        let bad_status = StatusRow {
            timestamp_utc: utc(25, 13, 0),
            status: "on fire".into(),
        };
        assert!(matches!(
            parse_status_row(1, bad_status),
            Err(ApiError::Validation(_))
        ));

        let bad_day = BusinessHoursRow {
            day: -1,
            start_time_local: time(9, 0),
            end_time_local: time(17, 0),
        };
        assert!(matches!(
            parse_hours_row(1, bad_day),
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_estimator_skips_malformed_rows() {
        let store = Arc::new(MemoryObservationStore::new());
        store.add_status(5, utc(25, 13, 40), "active");
        store.add_status(5, utc(25, 13, 50), "on fire");
        store.add_business_hours(5, 9, time(9, 0), time(17, 0));
        store.set_timezone(5, "Mars/Olympus_Mons");

        let estimator = ActivityEstimator::new(store, chrono_tz::UTC, false);
        let snap = estimator.load(5).await.unwrap();
        assert_eq!(snap.observations.len(), 1);
        assert!(snap.business_hours.is_empty());
        assert_eq!(snap.timezone, chrono_tz::UTC);

        let report = estimator.estimate(5, reference()).await.unwrap();
        assert_eq!(report.location_id, 5);
        assert_eq!(report.uptime_last_hour, 60);
    }

    #[tokio::test]
    async fn test_estimator_unknown_location_reports_downtime() {
        let store = Arc::new(MemoryObservationStore::new());
        let estimator = ActivityEstimator::new(store, chrono_tz::America::Chicago, false);

        let report = estimator.estimate(404, reference()).await.unwrap();
        assert_eq!(report.downtime_last_hour, 60);
        assert_eq!(report.downtime_last_day, 24);
        assert_eq!(report.downtime_last_week, 168);
    }

    fn timeline(snap: &LocationSnapshot) -> Vec<(DateTime<Utc>, Status)> {
        snap.observations
            .iter()
            .map(|obs| (obs.timestamp_utc, obs.status))
            .collect()
    }
}
