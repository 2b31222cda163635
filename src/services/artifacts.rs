//! CSV rendering and on-disk storage of finished reports.

use crate::domain::ActivityReport;
use crate::errors::{ApiError, ApiResult};
use crate::utils::report_id_from_file_name;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;
use uuid::Uuid;

pub const CSV_COLUMNS: [&str; 7] = [
    "location_id",
    "uptime_last_hour",
    "uptime_last_day",
    "uptime_last_week",
    "downtime_last_hour",
    "downtime_last_day",
    "downtime_last_week",
];

pub fn render_csv(reports: &[ActivityReport]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');
    for r in reports {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            r.location_id,
            r.uptime_last_hour,
            r.uptime_last_day,
            r.uptime_last_week,
            r.downtime_last_hour,
            r.downtime_last_day,
            r.downtime_last_week,
        );
    }
    out
}

/// Directory of `report-<id>.csv` files
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Report ids are UUIDs; anything else never names a file here
    fn path_for(&self, report_id: &str) -> ApiResult<PathBuf> {
        let id = Uuid::parse_str(report_id)
            .map_err(|_| ApiError::NotFound(format!("report {}", report_id)))?;
        Ok(self.dir.join(format!("report-{}.csv", id.hyphenated())))
    }

    pub async fn write(&self, report_id: &str, reports: &[ActivityReport]) -> ApiResult<PathBuf> {
        let path = self.path_for(report_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, render_csv(reports)).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    pub async fn read(&self, report_id: &str) -> ApiResult<String> {
        let path = self.path_for(report_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ApiError::NotFound(format!("report {}", report_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete artifacts older than `retention`, returning how many went
    pub async fn sweep(&self, retention: Duration) -> ApiResult<usize> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let Some(report_id) = name.to_str().and_then(report_id_from_file_name) else {
                continue;
            };
            let modified = entry.metadata().await?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age >= retention {
                tokio::fs::remove_file(entry.path()).await?;
                debug!(report_id, ?age, "deleted expired report artifact");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(location_id: i64, up_hour: u32) -> ActivityReport {
        ActivityReport {
            location_id,
            uptime_last_hour: up_hour,
            uptime_last_day: 20,
            uptime_last_week: 150,
            downtime_last_hour: 60 - up_hour,
            downtime_last_day: 4,
            downtime_last_week: 18,
        }
    }

    #[test]
    fn test_render_csv_column_order() {
        let csv = render_csv(&[report(8419537941919820732, 45)]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("location_id,uptime_last_hour,uptime_last_day,uptime_last_week,downtime_last_hour,downtime_last_day,downtime_last_week")
        );
        assert_eq!(lines.next(), Some("8419537941919820732,45,20,150,15,4,18"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_render_csv_empty_has_header() {
        assert_eq!(render_csv(&[]).lines().count(), 1);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("reports"));
        let id = Uuid::new_v4().to_string();

        let path = store.write(&id, &[report(1, 60)]).await.unwrap();
        assert!(path.ends_with(format!("report-{}.csv", id)));

        let body = store.read(&id).await.unwrap();
        assert!(body.contains("\n1,60,20,150,0,4,18\n"));
    }

    #[tokio::test]
    async fn test_read_missing_or_malformed_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let missing = store.read(&Uuid::new_v4().to_string()).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        let traversal = store.read("../../etc/passwd").await;
        assert!(matches!(traversal, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sweep_only_touches_report_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let id = Uuid::new_v4().to_string();
        store.write(&id, &[report(1, 60)]).await.unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "keep").await.unwrap();

        assert_eq!(store.sweep(Duration::from_secs(3600)).await.unwrap(), 0);
        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 1);
        assert!(matches!(store.read(&id).await, Err(ApiError::NotFound(_))));
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_sweep_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("absent"));
        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 0);
    }
}
