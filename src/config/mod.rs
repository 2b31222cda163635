/// Application configuration module
use crate::utils::parse_utc_timestamp;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub report: ReportSettings,
    pub sweep: SweepSettings,
}

/// Tunables for report generation and the report registry
#[derive(Clone, Debug)]
pub struct ReportSettings {
    pub reference_instant: DateTime<Utc>,
    pub default_timezone: Tz,
    pub max_locations: usize,
    pub concurrency: usize,
    pub unit_timeout: Duration,
    pub registry_capacity: usize,
    pub registry_ttl: Duration,
    pub report_dir: PathBuf,
    pub restrict_to_business_hours: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            // 2023-01-25 14:04:00.152582 UTC
            reference_instant: DateTime::from_timestamp(1_674_655_440, 152_582_000)
                .unwrap_or_default(),
            default_timezone: chrono_tz::America::Chicago,
            max_locations: 500,
            concurrency: 32,
            unit_timeout: Duration::from_secs(30),
            registry_capacity: 100,
            registry_ttl: Duration::from_secs(3600),
            report_dir: PathBuf::from("reports"),
            restrict_to_business_hours: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SweepSettings {
    pub every_seconds: u64,
    pub artifact_retention: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let defaults = ReportSettings::default();

        let reference_instant = match env::var("REFERENCE_INSTANT") {
            Ok(raw) => parse_utc_timestamp(&raw)
                .ok_or_else(|| anyhow!("REFERENCE_INSTANT '{}' is not a valid timestamp", raw))?,
            Err(_) => defaults.reference_instant,
        };

        let default_timezone = match env::var("DEFAULT_TIMEZONE") {
            Ok(raw) => raw
                .parse::<Tz>()
                .map_err(|e| anyhow!("DEFAULT_TIMEZONE '{}' is invalid: {}", raw, e))?,
            Err(_) => defaults.default_timezone,
        };

        let report = ReportSettings {
            reference_instant,
            default_timezone,
            max_locations: env_u64("REPORT_MAX_LOCATIONS", 500) as usize,
            concurrency: env_u64("REPORT_CONCURRENCY", 32).max(1) as usize,
            unit_timeout: Duration::from_secs(env_u64("REPORT_UNIT_TIMEOUT_SECONDS", 30)),
            registry_capacity: env_u64("REGISTRY_CAPACITY", 100).max(1) as usize,
            registry_ttl: Duration::from_secs(env_u64("REGISTRY_TTL_SECONDS", 3600)),
            report_dir: env::var("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
            restrict_to_business_hours: env_bool("RESTRICT_TO_BUSINESS_HOURS", false),
        };

        let sweep = SweepSettings {
            every_seconds: env_u64("SWEEP_EVERY_SECONDS", 300).max(1),
            artifact_retention: Duration::from_secs(env_u64("ARTIFACT_RETENTION_SECONDS", 86400)),
        };

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections: env_u64("DB_MAX_CONNECTIONS", 5) as u32,
            report,
            sweep,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|s| parse_bool(&s))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
