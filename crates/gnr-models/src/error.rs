use thiserror::Error;

use gnr_core::models::antibiotic::Target;
use gnr_core::models::snapshot::Hospital;
use gnr_encoder::EncodingError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load model artifact '{key}': {reason}")]
    ArtifactLoad { key: String, reason: String },

    #[error("feature schema mismatch for '{target}': model expects {expected:?}, got {actual:?}")]
    SchemaMismatch {
        target: Target,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("no model loaded for '{target}' at {hospital}")]
    ModelNotFound { target: Target, hospital: Hospital },

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

impl ModelError {
    pub(crate) fn load(key: &str, reason: impl ToString) -> Self {
        ModelError::ArtifactLoad {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
