use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;

use gnr_core::models::snapshot::ClinicalInputSnapshot;
use gnr_report::render::render_report;
use gnr_report::{PredictionReport, build_report};

use crate::error::ApiError;
use crate::state::AppState;

/// Body parsing goes through `serde_json` so a malformed snapshot surfaces
/// as a JSON 400 like every other error.
fn parse_snapshot(body: &[u8]) -> Result<ClinicalInputSnapshot, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn create_prediction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionReport>, ApiError> {
    let snapshot = parse_snapshot(&body)?;
    let report = build_report(&snapshot, &state.encoder, &state.registry)?;
    Ok(Json(report))
}

pub async fn create_prediction_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Html<String>, ApiError> {
    let snapshot = parse_snapshot(&body)?;
    let report = build_report(&snapshot, &state.encoder, &state.registry)?;
    Ok(Html(render_report(&report)?))
}
