//! gnr-report
//!
//! Runs every configured target through the encoder and its model, then
//! shapes the results for display: a sorted table, a bar chart with the
//! severity threshold, an echo of the inputs, and an HTML page.

pub mod assess;
pub mod chart;
pub mod error;
pub mod inputs;
pub mod render;
pub mod table;

pub use assess::{Assessment, Susceptibility, assess};
pub use error::ReportError;

use serde::Serialize;
use ts_rs::TS;

use gnr_core::models::snapshot::ClinicalInputSnapshot;
use gnr_encoder::Encoder;
use gnr_models::ModelRegistry;

/// Everything shown for one submission.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PredictionReport {
    pub assessment: Assessment,
    pub rows: Vec<table::SusceptibilityRow>,
    pub chart: chart::Chart,
    pub inputs: Vec<inputs::InputRow>,
}

/// Assess `snapshot` and lay the results out for display.
pub fn build_report(
    snapshot: &ClinicalInputSnapshot,
    encoder: &Encoder,
    registry: &ModelRegistry,
) -> Result<PredictionReport, ReportError> {
    let assessment = assess(snapshot, encoder, registry)?;
    let rows = table::susceptibility_table(&assessment.results, snapshot.severity_cutoff);
    let chart = chart::Chart::new(&rows, snapshot.severity_cutoff);
    let inputs = inputs::input_rows(snapshot);

    Ok(PredictionReport {
        assessment,
        rows,
        chart,
        inputs,
    })
}
