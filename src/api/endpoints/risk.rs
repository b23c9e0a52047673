//! Risk endpoints.
//!
//! `GET /api/risk/report`: every population view.
//! `GET /api/risk/cohort?page=N`: one page of the follow-up cohort.
//! `GET /api/risk/patients/:id`: merged state for one patient.
//!
//! Each request resolves a fresh snapshot and recomputes from it.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::RiskLevel;
use crate::risk::{ClinicalSnapshot, CohortEntry, RiskEngine, RiskReport};

#[derive(Deserialize)]
pub struct CohortQuery {
    pub page: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortPageResponse {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_entries: usize,
    pub entries: Vec<CohortEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRiskResponse {
    pub patient_id: String,
    pub name: String,
    pub department: String,
    pub level: RiskLevel,
    pub factors: BTreeSet<String>,
    pub last_observed_at: Option<NaiveDateTime>,
}

/// Run the engine off the async runtime; the computation is CPU-bound.
async fn compute_report(
    ctx: &ApiContext,
    snapshot: ClinicalSnapshot,
) -> Result<RiskReport, ApiError> {
    let engine = ctx.engine.clone();
    tokio::task::spawn_blocking(move || engine.compute(&snapshot))
        .await
        .map_err(|e| ApiError::Internal(format!("Risk computation task failed: {e}")))
}

fn parse_page(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(text) => text.parse::<usize>().map_err(|_| {
            ApiError::BadRequest(format!("page must be a non-negative integer, got '{text}'"))
        }),
    }
}

/// `GET /api/risk/report`
pub async fn report(State(ctx): State<ApiContext>) -> Result<Json<RiskReport>, ApiError> {
    let snapshot = ctx.snapshot().await?;
    Ok(Json(compute_report(&ctx, snapshot).await?))
}

/// `GET /api/risk/cohort?page=N`: page defaults to 1; pages past the end are empty.
pub async fn cohort(
    State(ctx): State<ApiContext>,
    Query(query): Query<CohortQuery>,
) -> Result<Json<CohortPageResponse>, ApiError> {
    let page = parse_page(query.page.as_deref())?;
    let snapshot = ctx.snapshot().await?;
    let report = compute_report(&ctx, snapshot).await?;
    let cohort = &report.cohort;

    Ok(Json(CohortPageResponse {
        page,
        page_size: cohort.page_size(),
        total_pages: cohort.total_pages(),
        total_entries: cohort.len(),
        entries: cohort.page(page).to_vec(),
    }))
}

/// `GET /api/risk/patients/:id`
pub async fn patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientRiskResponse>, ApiError> {
    let snapshot = ctx.snapshot().await?;

    let state = ctx
        .engine
        .patient_state(&snapshot, &patient_id)
        .ok_or_else(|| ApiError::NotFound(format!("Patient {patient_id} is not registered")))?;
    let registered = snapshot
        .patients
        .iter()
        .find(|p| p.id == patient_id)
        .ok_or_else(|| ApiError::Internal(format!("Registry lookup lost patient {patient_id}")))?;

    Ok(Json(PatientRiskResponse {
        patient_id: state.patient_id,
        name: registered.display_name().to_string(),
        department: registered.department.clone(),
        level: state.level,
        factors: state.factors,
        last_observed_at: state.last_observed_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parsing() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some(" 3 ")).unwrap(), 3);
        assert_eq!(parse_page(Some("0")).unwrap(), 0);
        assert!(matches!(parse_page(Some("-1")), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_page(Some("two")), Err(ApiError::BadRequest(_))));
    }
}
