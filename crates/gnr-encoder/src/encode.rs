use gnr_core::models::antibiotic::{Antibiotic, AntibioticClass, ClassTag, Combination, Target};
use gnr_core::models::snapshot::{
    AcquisitionSetting, AdmittingService, ClinicalInputSnapshot, ResistanceHistory, Sex,
};

use crate::error::EncodingError;
use crate::schema::{
    Column, CombinationResistanceRule, EncoderOptions, FeatureSchema, FeatureVector,
};
use crate::tables::EncoderTables;

/// Turns input snapshots into model feature vectors.
///
/// Holds only immutable tables and options, so one encoder can be shared by
/// every request.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    tables: EncoderTables,
    options: EncoderOptions,
}

/// Exposure and resistance features, which are the only ones that depend on
/// the target.
struct PriorFeatures {
    same_class: bool,
    different_class: bool,
    resistance: ResistanceHistory,
}

impl Encoder {
    pub fn new(tables: EncoderTables, options: EncoderOptions) -> Self {
        Self { tables, options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Targets served, in presentation order.
    pub fn targets(&self) -> &[Target] {
        self.tables.targets()
    }

    /// The column layout `encode` produces for `target`.
    pub fn schema(&self, target: Target) -> Result<FeatureSchema, EncodingError> {
        let class = self.class_of(target)?;
        Ok(FeatureSchema::new(target, class, &self.options))
    }

    /// Encode `snapshot` for `target`'s model.
    pub fn encode(
        &self,
        snapshot: &ClinicalInputSnapshot,
        target: Target,
    ) -> Result<FeatureVector, EncodingError> {
        let schema = self.schema(target)?;

        let age = self
            .tables
            .age_midpoint(snapshot.age_bucket)
            .ok_or_else(|| {
                EncodingError::missing(target, format!("age midpoint {}", snapshot.age_bucket))
            })?;

        let prior = match target {
            Target::Single(antibiotic) => self.single_priors(snapshot, antibiotic, schema.class)?,
            Target::Combination(combination) => self.combination_priors(snapshot, combination)?,
        };

        Ok(schema.fill(|column| match column {
            Column::Age => age,
            Column::AgeBucket(bucket) => flag(snapshot.age_bucket == bucket),
            Column::SexMale => flag(snapshot.sex == Sex::Male),
            Column::AcquisitionIcu => flag(snapshot.acquisition_setting == AcquisitionSetting::Icu),
            Column::AcquisitionWard => {
                flag(snapshot.acquisition_setting == AcquisitionSetting::HospitalWard)
            }
            Column::IcuExposure => flag(snapshot.acquisition_setting == AcquisitionSetting::Icu),
            Column::Surgical => flag(snapshot.admitting_service == AdmittingService::Surgical),
            Column::RecentHospitalization => flag(snapshot.recent_hospitalization),
            Column::PriorSameClass => flag(prior.same_class),
            Column::PriorDifferentClass => flag(prior.different_class),
            Column::ResistanceSusceptible => {
                flag(prior.resistance == ResistanceHistory::Susceptible)
            }
            Column::ResistanceNonsusceptible => {
                flag(prior.resistance == ResistanceHistory::Nonsusceptible)
            }
            Column::ClinicalEsbl => flag(snapshot.clinical_esbl),
        }))
    }

    fn class_of(&self, target: Target) -> Result<ClassTag, EncodingError> {
        if !self.tables.is_configured(target) {
            return Err(EncodingError::UnknownTarget(target));
        }
        self.tables
            .class_of(target)
            .ok_or(EncodingError::UnknownTarget(target))
    }

    fn single_priors(
        &self,
        snapshot: &ClinicalInputSnapshot,
        antibiotic: Antibiotic,
        class: ClassTag,
    ) -> Result<PriorFeatures, EncodingError> {
        let target = Target::Single(antibiotic);
        let own = class
            .exposure_class()
            .ok_or_else(|| EncodingError::missing(target, format!("Prior{class}")))?;

        let same_class = exposure(snapshot, target, own)?;

        // The synthetic combination tag is not in AntibioticClass, so it never
        // takes part here.
        let mut different_class = false;
        for other in AntibioticClass::ALL.into_iter().filter(|c| *c != own) {
            different_class |= exposure(snapshot, target, other)?;
        }

        let resistance = resistance(snapshot, target, antibiotic)?;

        Ok(PriorFeatures {
            same_class,
            different_class,
            resistance,
        })
    }

    fn combination_priors(
        &self,
        snapshot: &ClinicalInputSnapshot,
        combination: Combination,
    ) -> Result<PriorFeatures, EncodingError> {
        use AntibioticClass::*;

        let target = Target::Combination(combination);
        match combination {
            Combination::PiptazOrTobramycin => {
                let penicillin = exposure(snapshot, target, Penicillin)?;
                let amg = exposure(snapshot, target, Amg)?;
                let cephalosporin = exposure(snapshot, target, Cephalosporin)?;
                let carbapenem = exposure(snapshot, target, Carbapenem)?;
                let fq = exposure(snapshot, target, Fq)?;
                let other = exposure(snapshot, target, OtherAbx)?;

                let [first, second] = combination.components();
                let first_state = resistance(snapshot, target, first)?;
                let second_state = resistance(snapshot, target, second)?;

                Ok(PriorFeatures {
                    same_class: penicillin || amg,
                    // AMG counts as both same and different class for this model.
                    different_class: cephalosporin || carbapenem || fq || amg || other,
                    resistance: combine_resistance(
                        self.options.combination_resistance,
                        target,
                        (first, first_state),
                        (second, second_state),
                    )?,
                })
            }
        }
    }
}

/// Joint resistance history of a combination's two components.
fn combine_resistance(
    rule: CombinationResistanceRule,
    target: Target,
    (first, first_state): (Antibiotic, ResistanceHistory),
    (second, second_state): (Antibiotic, ResistanceHistory),
) -> Result<ResistanceHistory, EncodingError> {
    use ResistanceHistory::*;

    match (first_state, second_state) {
        (NoIsolateOrUnknown, NoIsolateOrUnknown) => Ok(NoIsolateOrUnknown),
        (Susceptible, _) | (_, Susceptible) => Ok(Susceptible),
        (Nonsusceptible, Nonsusceptible) => Ok(Nonsusceptible),
        (NoIsolateOrUnknown, Nonsusceptible) | (Nonsusceptible, NoIsolateOrUnknown) => match rule {
            CombinationResistanceRule::Legacy => Ok(Susceptible),
            CombinationResistanceRule::Strict => Err(EncodingError::InvalidResistanceCombination {
                target,
                first,
                first_state,
                second,
                second_state,
            }),
        },
    }
}

fn exposure(
    snapshot: &ClinicalInputSnapshot,
    target: Target,
    class: AntibioticClass,
) -> Result<bool, EncodingError> {
    snapshot
        .exposure(class)
        .ok_or_else(|| EncodingError::missing(target, format!("Prior{class}")))
}

fn resistance(
    snapshot: &ClinicalInputSnapshot,
    target: Target,
    antibiotic: Antibiotic,
) -> Result<ResistanceHistory, EncodingError> {
    snapshot
        .resistance(antibiotic)
        .ok_or_else(|| EncodingError::missing(target, format!("Prior{antibiotic}Resistance")))
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}
