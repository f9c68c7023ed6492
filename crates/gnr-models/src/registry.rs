use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use gnr_core::artifact_keys;
use gnr_core::models::antibiotic::Target;
use gnr_core::models::snapshot::Hospital;
use gnr_encoder::{Encoder, FeatureVector};

use crate::artifact::LogisticArtifact;
use crate::error::ModelError;
use crate::predictor::Predictor;

/// Whether each site has its own fitted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactLayout {
    /// `{target}_{hospital}.json`, one model per target and site.
    #[default]
    PerSite,
    /// `{target}.json`, one model per target for every site.
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub target: Target,
    pub hospital: Option<Hospital>,
}

/// Every loaded model, keyed by target and (per-site layout) hospital.
///
/// Built once and then only read, so it can be shared behind an `Arc`
/// without locking.
pub struct ModelRegistry {
    layout: ArtifactLayout,
    models: HashMap<ModelKey, Arc<dyn Predictor>>,
}

impl ModelRegistry {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self {
            layout,
            models: HashMap::new(),
        }
    }

    /// Load the artifact for every target (and hospital, for per-site
    /// layouts) from `dir`. Any missing or unreadable artifact fails the
    /// whole load.
    pub fn load(
        dir: &Path,
        targets: &[Target],
        hospitals: &[Hospital],
        layout: ArtifactLayout,
    ) -> Result<Self, ModelError> {
        let mut registry = Self::new(layout);

        for &target in targets {
            match layout {
                ArtifactLayout::PerSite => {
                    for &hospital in hospitals {
                        let key = artifact_keys::site_model(target, hospital);
                        let artifact = read_artifact(dir, &key, target, Some(hospital))?;
                        registry.insert(target, Some(hospital), Arc::new(artifact));
                    }
                }
                ArtifactLayout::Shared => {
                    let key = artifact_keys::shared_model(target);
                    let artifact = read_artifact(dir, &key, target, None)?;
                    registry.insert(target, None, Arc::new(artifact));
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            layout = ?layout,
            models = registry.len(),
            "model registry loaded"
        );
        Ok(registry)
    }

    pub fn layout(&self) -> ArtifactLayout {
        self.layout
    }

    pub fn insert(
        &mut self,
        target: Target,
        hospital: Option<Hospital>,
        predictor: Arc<dyn Predictor>,
    ) {
        self.models.insert(ModelKey { target, hospital }, predictor);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Hospitals with a model for every one of `targets`.
    pub fn hospitals_covering(&self, targets: &[Target]) -> Vec<Hospital> {
        Hospital::ALL
            .into_iter()
            .filter(|&h| targets.iter().all(|&t| self.models.contains_key(&self.key(t, h))))
            .collect()
    }

    fn key(&self, target: Target, hospital: Hospital) -> ModelKey {
        let hospital = match self.layout {
            ArtifactLayout::PerSite => Some(hospital),
            ArtifactLayout::Shared => None,
        };
        ModelKey { target, hospital }
    }

    pub fn predictor(
        &self,
        target: Target,
        hospital: Hospital,
    ) -> Result<&Arc<dyn Predictor>, ModelError> {
        self.models
            .get(&self.key(target, hospital))
            .ok_or(ModelError::ModelNotFound { target, hospital })
    }

    /// Probability of susceptibility for an encoded request.
    ///
    /// The vector's column names must equal the fitted names, in order.
    pub fn predict(&self, hospital: Hospital, vector: &FeatureVector) -> Result<f64, ModelError> {
        let predictor = self.predictor(vector.target, hospital)?;
        check_schema(vector.target, predictor.feature_names(), vector.names())?;
        let [susceptible, _] = predictor.predict_proba(vector.values());
        Ok(susceptible)
    }

    /// Compare every loaded model against the columns `encoder` will produce.
    pub fn validate_schemas(&self, encoder: &Encoder) -> Result<(), ModelError> {
        for (key, predictor) in &self.models {
            if !encoder.targets().contains(&key.target) {
                continue;
            }
            let expected = encoder.schema(key.target)?.names();
            check_schema(key.target, predictor.feature_names(), &expected)?;
        }
        Ok(())
    }
}

fn read_artifact(
    dir: &Path,
    key: &str,
    target: Target,
    hospital: Option<Hospital>,
) -> Result<LogisticArtifact, ModelError> {
    let path = dir.join(key);
    let bytes = std::fs::read(&path).map_err(|e| ModelError::load(key, e))?;
    let artifact = LogisticArtifact::from_slice(key, &bytes)?;

    if artifact.target != target {
        return Err(ModelError::load(
            key,
            format!("artifact was fitted for '{}', expected '{target}'", artifact.target),
        ));
    }
    if let (Some(fitted), Some(expected)) = (artifact.hospital, hospital)
        && fitted != expected
    {
        return Err(ModelError::load(
            key,
            format!("artifact was fitted at {fitted}, expected {expected}"),
        ));
    }
    tracing::debug!(
        path = %path.display(),
        target = %artifact.target,
        features = artifact.feature_names.len(),
        "loaded model artifact"
    );
    Ok(artifact)
}

fn check_schema(target: Target, fitted: &[String], presented: &[String]) -> Result<(), ModelError> {
    if fitted != presented {
        return Err(ModelError::SchemaMismatch {
            target,
            expected: fitted.to_vec(),
            actual: presented.to_vec(),
        });
    }
    Ok(())
}
