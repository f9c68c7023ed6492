//! Model artifact naming conventions.
//!
//! Pure string functions with no filesystem access. These define the canonical
//! layout of fitted model files inside the model directory.

use crate::models::antibiotic::Target;
use crate::models::snapshot::Hospital;

pub const ARTIFACT_EXTENSION: &str = "json";

/// Artifact for a model fitted on one hospital's data, e.g. `Meropenem_TOH.json`.
pub fn site_model(target: Target, hospital: Hospital) -> String {
    format!("{}_{}.{ARTIFACT_EXTENSION}", target.id(), hospital.id())
}

/// Artifact for a model shared by every site, e.g. `Piptaz_or_Tobramycin.json`.
pub fn shared_model(target: Target) -> String {
    format!("{}.{ARTIFACT_EXTENSION}", target.id())
}
