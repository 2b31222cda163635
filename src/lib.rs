//! Store uptime/downtime reporting service.
//!
//! Sparse status polls per store are resampled into last-hour, last-day and
//! last-week activity counts; reports run across all stores in the
//! background and are polled for completion.

pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repo;
pub mod routes;
pub mod services;
pub mod utils;
