//! Report orchestration: fan out estimation across locations, collect the
//! results into the registry and hand finished reports out once.

use crate::config::ReportSettings;
use crate::domain::{LocationFailure, LocationId, ReportStatus};
use crate::errors::ApiResult;
use crate::repo::ObservationStore;
use crate::services::artifacts::ArtifactStore;
use crate::services::estimator::ActivityEstimator;
use crate::services::registry::{ReportJob, ReportRegistry};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, error, info, warn};

/// Report generation service
pub struct ReportService {
    store: Arc<dyn ObservationStore>,
    estimator: Arc<ActivityEstimator>,
    registry: Arc<ReportRegistry>,
    artifacts: ArtifactStore,
    settings: ReportSettings,
    permits: Arc<Semaphore>,
    trigger_lock: Mutex<()>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ObservationStore>, settings: ReportSettings) -> Self {
        let estimator = Arc::new(ActivityEstimator::new(
            store.clone(),
            settings.default_timezone,
            settings.restrict_to_business_hours,
        ));
        let registry = Arc::new(ReportRegistry::new(
            settings.registry_capacity,
            settings.registry_ttl,
        ));

        Self {
            store,
            estimator,
            registry,
            artifacts: ArtifactStore::new(settings.report_dir.clone()),
            permits: Arc::new(Semaphore::new(settings.concurrency.max(1))),
            settings,
            trigger_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &ReportRegistry {
        &self.registry
    }

    /// Start a report, or return the id of the one already in flight.
    ///
    /// Only a failure to enumerate locations is surfaced; per-location
    /// problems end up in the job's failure list.
    pub async fn trigger(&self) -> ApiResult<String> {
        let _guard = self.trigger_lock.lock().await;

        if let Some(job) = self.registry.live_job() {
            info!(report_id = job.id(), "report already in flight, reusing it");
            return Ok(job.id().to_string());
        }

        let mut locations = self.store.list_location_ids().await?;
        if locations.len() > self.settings.max_locations {
            warn!(
                total = locations.len(),
                dropped = locations.len() - self.settings.max_locations,
                "location count exceeds fan-out limit, truncating report"
            );
            locations.truncate(self.settings.max_locations);
        }

        let job = Arc::new(ReportJob::new(locations.len()));
        self.registry.insert(job.clone());
        info!(
            report_id = job.id(),
            locations = locations.len(),
            reference = %self.settings.reference_instant,
            "report triggered"
        );

        for location_id in locations {
            tokio::spawn(run_unit(
                self.estimator.clone(),
                self.permits.clone(),
                job.clone(),
                location_id,
                self.settings.reference_instant,
                self.settings.unit_timeout,
            ));
        }

        Ok(job.id().to_string())
    }

    /// Current state of a report. The first `Complete` also writes the CSV
    /// artifact; afterwards the id is unknown.
    pub async fn poll(&self, report_id: &str) -> ApiResult<ReportStatus> {
        let status = self.registry.poll(report_id)?;

        if let ReportStatus::Complete { data, failed } = &status {
            info!(
                report_id,
                locations = data.len(),
                failed = failed.len(),
                "report complete"
            );
            if let Err(e) = self.artifacts.write(report_id, data).await {
                error!(report_id, error = %e, "failed to write report artifact");
            }
        }

        Ok(status)
    }

    /// Rendered CSV of a finished report
    pub async fn download(&self, report_id: &str) -> ApiResult<String> {
        self.artifacts.read(report_id).await
    }

    /// Drop expired registry entries and stale artifacts
    pub async fn sweep(&self, artifact_retention: Duration) -> ApiResult<(usize, usize)> {
        let jobs = self.registry.purge_expired();
        let files = self.artifacts.sweep(artifact_retention).await?;
        if jobs + files > 0 {
            debug!(jobs, files, "sweep removed expired reports");
        }
        Ok((jobs, files))
    }
}

/// One location's unit of work. Errors, panics and timeouts become a
/// recorded failure so the job can still complete.
async fn run_unit(
    estimator: Arc<ActivityEstimator>,
    permits: Arc<Semaphore>,
    job: Arc<ReportJob>,
    location_id: LocationId,
    reference: DateTime<Utc>,
    timeout: Duration,
) {
    let outcome = match permits.acquire_owned().await {
        Ok(_permit) => {
            let mut work =
                tokio::spawn(async move { estimator.estimate(location_id, reference).await });
            match tokio::time::timeout(timeout, &mut work).await {
                Ok(Ok(Ok(report))) => Ok(report),
                Ok(Ok(Err(e))) => Err(e.to_string()),
                Ok(Err(join_err)) => Err(format!("estimation aborted: {}", join_err)),
                Err(_) => {
                    work.abort();
                    Err(format!("estimation timed out after {:?}", timeout))
                }
            }
        }
        Err(_) => Err("estimation scheduler closed".to_string()),
    };

    let accepted = match outcome {
        Ok(report) => job.append(report),
        Err(reason) => {
            warn!(report_id = job.id(), location_id, %reason, "location estimate failed");
            job.record_failure(LocationFailure {
                location_id,
                reason,
            })
        }
    };

    if !accepted {
        debug!(report_id = job.id(), location_id, "discarded result for closed report");
    }
}
