/// HTTP request handlers
use crate::domain::{Health, ReportStatus};
use crate::errors::ApiError;
use crate::services::ReportService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct Triggered {
    pub report_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub report_id: String,
}

/// Missing or malformed query strings answer with the JSON error body
fn report_query(
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<ReportQuery, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Start a report or reuse the one in flight
pub async fn trigger_report(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Triggered>>, ApiError> {
    let report_id = state.report_service.trigger().await?;
    Ok(Json(SuccessResponse::new(Triggered { report_id })))
}

/// Poll a report
pub async fn get_report(
    query: Result<Query<ReportQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<ReportStatus>>, ApiError> {
    let query = report_query(query)?;
    let status = state.report_service.poll(&query.report_id).await?;
    Ok(Json(SuccessResponse::new(status)))
}

/// Download a finished report as CSV
pub async fn download_report(
    query: Result<Query<ReportQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let query = report_query(query)?;
    let body = state.report_service.download(&query.report_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        body,
    ))
}
