//! Loading artifacts from a model directory and predicting through the registry.

use std::path::Path;
use std::sync::Arc;

use gnr_core::artifact_keys;
use gnr_core::models::antibiotic::{Antibiotic, AntibioticClass, Target};
use gnr_core::models::snapshot::{
    AcquisitionSetting, AdmittingService, AgeBucket, ClinicalInputSnapshot, Hospital,
    ResistanceHistory, SeverityCutoff, Sex,
};
use gnr_encoder::{AgeEncoding, Encoder, EncoderOptions, EncoderTables};
use gnr_models::{ArtifactLayout, LogisticArtifact, ModelError, ModelRegistry, Predictor};

const SITES: [Hospital; 2] = [Hospital::Sunnybrook, Hospital::Toh];

fn snapshot() -> ClinicalInputSnapshot {
    ClinicalInputSnapshot {
        hospital: Hospital::Toh,
        age_bucket: AgeBucket::From70To74,
        sex: Sex::Male,
        acquisition_setting: AcquisitionSetting::Icu,
        admitting_service: AdmittingService::Medical,
        recent_hospitalization: true,
        clinical_esbl: false,
        prior_class_exposure: AntibioticClass::ALL.into_iter().map(|c| (c, false)).collect(),
        prior_resistance_history: Antibiotic::ALL
            .into_iter()
            .map(|a| (a, ResistanceHistory::Susceptible))
            .collect(),
        severity_cutoff: SeverityCutoff::Ninety,
    }
}

/// An artifact fitted on `encoder`'s columns with a single non-zero weight
/// on `sex_M`.
fn artifact_for(
    encoder: &Encoder,
    target: Target,
    hospital: Option<Hospital>,
    sex_weight: f64,
) -> LogisticArtifact {
    let feature_names = encoder.schema(target).expect("configured target").names();
    let coefficients = feature_names
        .iter()
        .map(|n| if n == "sex_M" { sex_weight } else { 0.0 })
        .collect();
    LogisticArtifact {
        target,
        hospital,
        feature_names,
        coefficients,
        intercept: 0.0,
        metadata: Default::default(),
    }
}

fn write(dir: &Path, key: &str, artifact: &LogisticArtifact) {
    let json = serde_json::to_vec_pretty(artifact).expect("serialize artifact");
    std::fs::write(dir.join(key), json).expect("write artifact");
}

fn write_site_models(dir: &Path, encoder: &Encoder, sex_weight: f64) {
    for &target in encoder.targets() {
        for hospital in SITES {
            write(
                dir,
                &artifact_keys::site_model(target, hospital),
                &artifact_for(encoder, target, Some(hospital), sex_weight),
            );
        }
    }
}

#[test]
fn loads_one_model_per_target_and_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoder = Encoder::default();
    write_site_models(dir.path(), &encoder, 1.0);

    let registry = ModelRegistry::load(
        dir.path(),
        encoder.targets(),
        &SITES,
        ArtifactLayout::PerSite,
    )
    .expect("registry loads");

    assert_eq!(registry.len(), encoder.targets().len() * SITES.len());
    registry.validate_schemas(&encoder).expect("schemas agree");
    assert_eq!(registry.hospitals_covering(encoder.targets()), SITES.to_vec());

    let target = Target::Single(Antibiotic::Meropenem);
    let vector = encoder.encode(&snapshot(), target).expect("encodes");
    let probability = registry.predict(Hospital::Toh, &vector).expect("predicts");
    // Male with weight 1 on sex_M: P(nonsusceptible) = σ(1).
    let expected = 1.0 - 1.0 / (1.0 + (-1.0f64).exp());
    assert!((probability - expected).abs() < 1e-12);
}

#[test]
fn shared_layout_serves_every_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoder = Encoder::default();
    for &target in encoder.targets() {
        write(
            dir.path(),
            &artifact_keys::shared_model(target),
            &artifact_for(&encoder, target, None, 0.0),
        );
    }

    let registry =
        ModelRegistry::load(dir.path(), encoder.targets(), &[], ArtifactLayout::Shared)
            .expect("registry loads");
    let vector = encoder
        .encode(&snapshot(), Target::Single(Antibiotic::Piptaz))
        .expect("encodes");
    for hospital in Hospital::ALL {
        let p = registry.predict(hospital, &vector).expect("predicts");
        assert!((p - 0.5).abs() < 1e-12);
    }
}

#[test]
fn missing_artifact_fails_the_whole_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoder = Encoder::default();
    write_site_models(dir.path(), &encoder, 0.0);
    std::fs::remove_file(dir.path().join("Ceftazidime_TOH.json")).expect("remove");

    match ModelRegistry::load(dir.path(), encoder.targets(), &SITES, ArtifactLayout::PerSite) {
        Err(ModelError::ArtifactLoad { key, .. }) => assert_eq!(key, "Ceftazidime_TOH.json"),
        Err(other) => panic!("expected ArtifactLoad, got {other:?}"),
        Ok(_) => panic!("expected ArtifactLoad, got a registry"),
    }
}

#[test]
fn artifact_for_another_target_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoder = Encoder::default();
    let wrong = artifact_for(
        &encoder,
        Target::Single(Antibiotic::Piptaz),
        Some(Hospital::Sunnybrook),
        0.0,
    );
    write(dir.path(), "Meropenem_Sunnybrook.json", &wrong);

    let result = ModelRegistry::load(
        dir.path(),
        &[Target::Single(Antibiotic::Meropenem)],
        &[Hospital::Sunnybrook],
        ArtifactLayout::PerSite,
    );
    assert!(matches!(result, Err(ModelError::ArtifactLoad { .. })));
}

#[test]
fn unknown_site_has_no_model() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoder = Encoder::default();
    write_site_models(dir.path(), &encoder, 0.0);
    let registry =
        ModelRegistry::load(dir.path(), encoder.targets(), &SITES, ArtifactLayout::PerSite)
            .expect("registry loads");

    let vector = encoder
        .encode(&snapshot(), Target::Single(Antibiotic::Meropenem))
        .expect("encodes");
    assert!(matches!(
        registry.predict(Hospital::Trillium, &vector),
        Err(ModelError::ModelNotFound {
            hospital: Hospital::Trillium,
            ..
        })
    ));
    assert!(
        registry
            .hospitals_covering(encoder.targets())
            .iter()
            .all(|h| *h != Hospital::Trillium)
    );
}

#[test]
fn schema_mismatch_is_fatal() {
    let midpoint = Encoder::default();
    let one_hot = Encoder::new(
        EncoderTables::standard(),
        EncoderOptions {
            age: AgeEncoding::OneHot,
            ..Default::default()
        },
    );
    let target = Target::Single(Antibiotic::Ciprofloxacin);

    let mut registry = ModelRegistry::new(ArtifactLayout::Shared);
    registry.insert(target, None, Arc::new(artifact_for(&midpoint, target, None, 0.0)));

    let vector = one_hot.encode(&snapshot(), target).expect("encodes");
    match registry.predict(Hospital::Sunnybrook, &vector) {
        Err(ModelError::SchemaMismatch { expected, actual, .. }) => {
            assert_eq!(expected[0], "Age");
            assert_eq!(actual[0], "Age_<40");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    assert!(matches!(
        registry.validate_schemas(&one_hot),
        Err(ModelError::SchemaMismatch { .. })
    ));
}

/// A hand-written predictor plugs into the registry like a loaded artifact.
struct Constant {
    names: Vec<String>,
    susceptible: f64,
}

impl Predictor for Constant {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict_proba(&self, _features: &[f64]) -> [f64; 2] {
        [self.susceptible, 1.0 - self.susceptible]
    }
}

#[test]
fn custom_predictors_are_accepted() {
    let encoder = Encoder::default();
    let target = Target::Single(Antibiotic::Ceftriaxone);
    let mut registry = ModelRegistry::new(ArtifactLayout::PerSite);
    registry.insert(
        target,
        Some(Hospital::Sunnybrook),
        Arc::new(Constant {
            names: encoder.schema(target).expect("schema").names(),
            susceptible: 0.93,
        }),
    );

    let mut snapshot = snapshot();
    snapshot.hospital = Hospital::Sunnybrook;
    let vector = encoder.encode(&snapshot, target).expect("encodes");
    let p = registry.predict(snapshot.hospital, &vector).expect("predicts");
    assert!((p - 0.93).abs() < 1e-12);
}
