use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gnr_core::models::antibiotic::Target;
use gnr_core::models::snapshot::Hospital;

use crate::error::ModelError;
use crate::predictor::Predictor;

/// A fitted logistic regression exported by the training pipeline.
///
/// The positive class is "nonsusceptible": `p = σ(w·x + b)` and
/// `predict_proba` returns `[1 - p, p]`, so index 0 is the probability of
/// susceptibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub target: Target,
    #[serde(default)]
    pub hospital: Option<Hospital>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Free-form training details (dates, cohort size, AUC). Not used for prediction.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl LogisticArtifact {
    /// Parse and sanity-check an artifact. `key` names it in errors.
    pub fn from_slice(key: &str, bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: LogisticArtifact =
            serde_json::from_slice(bytes).map_err(|e| ModelError::load(key, e))?;
        artifact.validate(key)?;
        Ok(artifact)
    }

    fn validate(&self, key: &str) -> Result<(), ModelError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ModelError::load(key, "artifact has no features"));
        }
        if self.coefficients.len() != n {
            return Err(ModelError::load(
                key,
                format!(
                    "{} coefficients for {n} feature names",
                    self.coefficients.len()
                ),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::load(key, "non-finite model parameter"));
        }
        Ok(())
    }

    fn decision(&self, features: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Predictor for LogisticArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, features: &[f64]) -> [f64; 2] {
        let nonsusceptible = sigmoid(self.decision(features));
        [1.0 - nonsusceptible, nonsusceptible]
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_json(coefficients: &str) -> String {
        format!(
            r#"{{
                "target": "Meropenem",
                "hospital": "TOH",
                "feature_names": ["Age", "sex_M"],
                "coefficients": {coefficients},
                "intercept": 0.0
            }}"#
        )
    }

    #[test]
    fn zero_decision_is_even_odds() {
        let json = artifact_json("[0.0, 0.0]");
        let artifact = LogisticArtifact::from_slice("Meropenem_TOH.json", json.as_bytes())
            .expect("valid artifact");
        assert_eq!(artifact.target.id(), "Meropenem");
        assert_eq!(artifact.hospital, Some(Hospital::Toh));
        let [susceptible, nonsusceptible] = artifact.predict_proba(&[70.0, 1.0]);
        assert!((susceptible - 0.5).abs() < 1e-12);
        assert!((susceptible + nonsusceptible - 1.0).abs() < 1e-12);
    }

    #[test]
    fn positive_weights_lower_susceptibility() {
        let artifact =
            LogisticArtifact::from_slice("m", artifact_json("[0.0, 2.0]").as_bytes()).unwrap();
        let [without, _] = artifact.predict_proba(&[50.0, 0.0]);
        let [with, _] = artifact.predict_proba(&[50.0, 1.0]);
        assert!(with < without);
        assert!((with - 1.0 / (1.0 + 2f64.exp())).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_a_load_error() {
        let err = LogisticArtifact::from_slice("bad.json", artifact_json("[1.0]").as_bytes())
            .unwrap_err();
        match err {
            ModelError::ArtifactLoad { key, reason } => {
                assert_eq!(key, "bad.json");
                assert!(reason.contains("1 coefficients for 2"));
            }
            other => panic!("expected ArtifactLoad, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_bytes_are_a_load_error() {
        assert!(matches!(
            LogisticArtifact::from_slice("x.json", b"\x80not json"),
            Err(ModelError::ArtifactLoad { .. })
        ));
    }
}
