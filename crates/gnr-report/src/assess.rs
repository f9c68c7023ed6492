use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use gnr_core::models::antibiotic::Target;
use gnr_core::models::snapshot::{ClinicalInputSnapshot, Hospital};
use gnr_encoder::Encoder;
use gnr_models::ModelRegistry;

use crate::error::ReportError;

/// Predicted susceptibility for one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Susceptibility {
    pub target: Target,
    /// Probability in [0, 1].
    pub probability: f64,
    /// `probability * 100`, unrounded.
    pub percent: f64,
}

/// Results for one submission, in configured target order.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub created_at: jiff::Timestamp,
    pub hospital: Hospital,
    pub results: Vec<Susceptibility>,
}

/// Encode `snapshot` for every configured target and ask its model.
///
/// Either every target succeeds or the whole assessment fails; no partial
/// result list is ever returned.
pub fn assess(
    snapshot: &ClinicalInputSnapshot,
    encoder: &Encoder,
    registry: &ModelRegistry,
) -> Result<Assessment, ReportError> {
    let id = Uuid::new_v4();
    let mut results = Vec::with_capacity(encoder.targets().len());

    for &target in encoder.targets() {
        let vector = encoder.encode(snapshot, target)?;
        let probability = registry.predict(snapshot.hospital, &vector)?;
        tracing::debug!(
            assessment_id = %id,
            target = %target,
            probability,
            "predicted susceptibility"
        );
        results.push(Susceptibility {
            target,
            probability,
            percent: probability * 100.0,
        });
    }

    tracing::info!(
        assessment_id = %id,
        hospital = %snapshot.hospital,
        targets = results.len(),
        "assessment complete"
    );

    Ok(Assessment {
        id,
        created_at: jiff::Timestamp::now(),
        hospital: snapshot.hospital,
        results,
    })
}
