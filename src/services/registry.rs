//! In-memory registry of report jobs.
//!
//! Entries expire `ttl` after their last write and the least recently used
//! entry is evicted when the registry is full. Reading a finished job is a
//! single critical section that latches the job closed and evicts it, so late
//! writers can never append to a report that has already been handed out.

use crate::domain::{ActivityReport, LocationFailure, ReportStatus};
use crate::errors::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug)]
struct JobState {
    results: Vec<ActivityReport>,
    failures: Vec<LocationFailure>,
    completed: bool,
    last_write: Instant,
}

impl JobState {
    fn settled(&self, expected: usize) -> bool {
        self.results.len() + self.failures.len() >= expected
    }
}

/// Accumulating results of one report run
#[derive(Debug)]
pub struct ReportJob {
    id: String,
    expected_count: usize,
    created_at: DateTime<Utc>,
    state: Mutex<JobState>,
}

/// Snapshot of a job's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobProgress {
    pub expected: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ReportJob {
    pub fn new(expected_count: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            expected_count,
            created_at: Utc::now(),
            state: Mutex::new(JobState {
                results: Vec::with_capacity(expected_count),
                failures: Vec::new(),
                completed: false,
                last_write: Instant::now(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn expected_count(&self) -> usize {
        self.expected_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append one location's report. Returns `false` when the job is already
    /// handed out or every expected location has been accounted for.
    pub fn append(&self, report: ActivityReport) -> bool {
        let mut state = self.state.lock();
        if state.completed || state.settled(self.expected_count) {
            return false;
        }
        state.results.push(report);
        state.last_write = Instant::now();
        true
    }

    /// Record a location that produced no report; it counts toward completion.
    pub fn record_failure(&self, failure: LocationFailure) -> bool {
        let mut state = self.state.lock();
        if state.completed || state.settled(self.expected_count) {
            return false;
        }
        state.failures.push(failure);
        state.last_write = Instant::now();
        true
    }

    pub fn progress(&self) -> JobProgress {
        let state = self.state.lock();
        JobProgress {
            expected: self.expected_count,
            succeeded: state.results.len(),
            failed: state.failures.len(),
        }
    }

    fn expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.state.lock().last_write) >= ttl
    }
}

struct Entry {
    job: Arc<ReportJob>,
    last_access: Instant,
}

/// Capacity- and time-bounded map of report id to job
pub struct ReportRegistry {
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ReportRegistry {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, job: Arc<ReportJob>) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        Self::purge_locked(&mut entries, self.ttl, now);

        while entries.len() >= self.capacity {
            let lru = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(id, _)| id.clone());
            match lru {
                Some(id) => {
                    warn!(report_id = %id, "registry full, evicting least recently used report");
                    entries.remove(&id);
                }
                None => break,
            }
        }

        entries.insert(
            job.id().to_string(),
            Entry {
                job,
                last_access: now,
            },
        );
    }

    pub fn get(&self, report_id: &str) -> Option<Arc<ReportJob>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        Self::purge_locked(&mut entries, self.ttl, now);
        entries.get_mut(report_id).map(|entry| {
            entry.last_access = now;
            entry.job.clone()
        })
    }

    /// The job currently holding the single-flight slot, if any
    pub fn live_job(&self) -> Option<Arc<ReportJob>> {
        let mut entries = self.entries.lock();
        Self::purge_locked(&mut entries, self.ttl, Instant::now());
        entries
            .values()
            .max_by_key(|entry| entry.job.created_at())
            .map(|entry| entry.job.clone())
    }

    /// Report the job's state; a settled job is latched, drained and evicted.
    pub fn poll(&self, report_id: &str) -> ApiResult<ReportStatus> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        Self::purge_locked(&mut entries, self.ttl, now);

        let entry = entries
            .get_mut(report_id)
            .ok_or_else(|| ApiError::NotFound(format!("report {}", report_id)))?;
        entry.last_access = now;

        let status = {
            let mut state = entry.job.state.lock();
            if !state.settled(entry.job.expected_count) {
                return Ok(ReportStatus::Running);
            }
            state.completed = true;
            ReportStatus::Complete {
                data: std::mem::take(&mut state.results),
                failed: std::mem::take(&mut state.failures),
            }
        };

        entries.remove(report_id);
        info!(report_id, "report handed out and evicted");
        Ok(status)
    }

    pub fn remove(&self, report_id: &str) -> Option<Arc<ReportJob>> {
        self.entries.lock().remove(report_id).map(|entry| entry.job)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        Self::purge_locked(&mut entries, self.ttl, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_locked(entries: &mut HashMap<String, Entry>, ttl: Duration, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|id, entry| {
            if !entry.job.expired(ttl, now) {
                return true;
            }
            let progress = entry.job.progress();
            if progress.succeeded + progress.failed < progress.expected {
                warn!(
                    report_id = %id,
                    succeeded = progress.succeeded,
                    failed = progress.failed,
                    expected = progress.expected,
                    "report exhausted its lifetime before completing"
                );
            }
            false
        });
        before - entries.len()
    }
}
