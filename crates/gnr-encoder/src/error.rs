use thiserror::Error;

use gnr_core::models::antibiotic::{Antibiotic, Target};
use gnr_core::models::snapshot::ResistanceHistory;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("unknown target: {0}")]
    UnknownTarget(Target),

    #[error("missing input '{feature}' required to encode '{target}'")]
    MissingFeature { target: Target, feature: String },

    #[error("'{target}' cannot combine {first} {first_state:?} with {second} {second_state:?}")]
    InvalidResistanceCombination {
        target: Target,
        first: Antibiotic,
        first_state: ResistanceHistory,
        second: Antibiotic,
        second_state: ResistanceHistory,
    },
}

impl EncodingError {
    pub(crate) fn missing(target: Target, feature: impl Into<String>) -> Self {
        EncodingError::MissingFeature {
            target,
            feature: feature.into(),
        }
    }
}
