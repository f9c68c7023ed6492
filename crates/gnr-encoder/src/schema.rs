use serde::{Deserialize, Serialize};
use ts_rs::TS;

use gnr_core::models::antibiotic::{ClassTag, Target};
use gnr_core::models::snapshot::AgeBucket;

/// How age enters the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AgeEncoding {
    /// One `Age` column holding the bucket midpoint.
    #[default]
    Midpoint,
    /// One `Age_{bucket}` indicator column per bucket.
    OneHot,
}

/// How the acquisition setting enters the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AcquisitionEncoding {
    /// `acquisition_ICU` and `acquisition_ward`, community as baseline.
    #[default]
    Setting,
    /// A single `ICUExposure` flag.
    IcuExposure,
}

/// What to do when a combination's component histories disagree in a way
/// the fitted model has no category for (one unknown, one nonsusceptible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CombinationResistanceRule {
    /// Reject the request.
    #[default]
    Strict,
    /// Any unknown alongside a known result counts as susceptible.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct EncoderOptions {
    pub age: AgeEncoding,
    pub acquisition: AcquisitionEncoding,
    pub combination_resistance: CombinationResistanceRule,
}

/// Column names shared by every schema.
pub mod column {
    pub const AGE: &str = "Age";
    pub const SEX_MALE: &str = "sex_M";
    pub const ACQUISITION_ICU: &str = "acquisition_ICU";
    pub const ACQUISITION_WARD: &str = "acquisition_ward";
    pub const ICU_EXPOSURE: &str = "ICUExposure";
    pub const SURGICAL: &str = "adm_service_surgical";
    pub const RECENT_HOSPITALIZATION: &str = "RecentHospitalization";
    pub const CLINICAL_ESBL: &str = "ClinicalESBL";
}

/// One position in a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Age,
    AgeBucket(AgeBucket),
    SexMale,
    AcquisitionIcu,
    AcquisitionWard,
    IcuExposure,
    Surgical,
    RecentHospitalization,
    PriorSameClass,
    PriorDifferentClass,
    ResistanceSusceptible,
    ResistanceNonsusceptible,
    ClinicalEsbl,
}

impl Column {
    /// The column name the fitted artifact for `target` uses.
    pub fn name(&self, target: Target, class: ClassTag) -> String {
        match self {
            Column::Age => column::AGE.to_string(),
            Column::AgeBucket(bucket) => format!("Age_{}", bucket.label()),
            Column::SexMale => column::SEX_MALE.to_string(),
            Column::AcquisitionIcu => column::ACQUISITION_ICU.to_string(),
            Column::AcquisitionWard => column::ACQUISITION_WARD.to_string(),
            Column::IcuExposure => column::ICU_EXPOSURE.to_string(),
            Column::Surgical => column::SURGICAL.to_string(),
            Column::RecentHospitalization => column::RECENT_HOSPITALIZATION.to_string(),
            Column::PriorSameClass => format!("Prior{}", class.id()),
            Column::PriorDifferentClass => format!("PriorNon{}", class.id()),
            Column::ResistanceSusceptible => format!("{}Resistance_susceptible", target.id()),
            Column::ResistanceNonsusceptible => {
                format!("{}Resistance_nonsusceptible", target.id())
            }
            Column::ClinicalEsbl => column::CLINICAL_ESBL.to_string(),
        }
    }
}

/// Ordered columns of the vector presented to one target's model.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    pub target: Target,
    pub class: ClassTag,
    pub columns: Vec<Column>,
}

impl FeatureSchema {
    pub fn new(target: Target, class: ClassTag, options: &EncoderOptions) -> Self {
        let mut columns = Vec::with_capacity(22);

        match options.age {
            AgeEncoding::Midpoint => columns.push(Column::Age),
            AgeEncoding::OneHot => columns.extend(AgeBucket::ALL.map(Column::AgeBucket)),
        }
        columns.push(Column::SexMale);
        match options.acquisition {
            AcquisitionEncoding::Setting => {
                columns.push(Column::AcquisitionIcu);
                columns.push(Column::AcquisitionWard);
            }
            AcquisitionEncoding::IcuExposure => columns.push(Column::IcuExposure),
        }
        columns.extend([
            Column::Surgical,
            Column::RecentHospitalization,
            Column::PriorSameClass,
            Column::PriorDifferentClass,
            Column::ResistanceSusceptible,
            Column::ResistanceNonsusceptible,
            Column::ClinicalEsbl,
        ]);

        Self {
            target,
            class,
            columns,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.name(self.target, self.class))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Lay `value_of` out in schema order.
    pub(crate) fn fill(&self, value_of: impl Fn(Column) -> f64) -> FeatureVector {
        FeatureVector {
            target: self.target,
            names: self.names(),
            columns: self.columns.clone(),
            values: self.columns.iter().map(|c| value_of(*c)).collect(),
        }
    }
}

/// An encoded request for one target: named values in model order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub target: Target,
    names: Vec<String>,
    #[serde(skip)]
    columns: Vec<Column>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a column by its artifact name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Value of a column by its role, independent of target naming.
    pub fn value(&self, column: Column) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnr_core::models::antibiotic::{
        Antibiotic, AntibioticClass, Combination, CombinedClass,
    };

    #[test]
    fn production_schema_column_order() {
        let schema = FeatureSchema::new(
            Target::Single(Antibiotic::Meropenem),
            ClassTag::Class(AntibioticClass::Carbapenem),
            &EncoderOptions::default(),
        );
        assert_eq!(
            schema.names(),
            vec![
                "Age",
                "sex_M",
                "acquisition_ICU",
                "acquisition_ward",
                "adm_service_surgical",
                "RecentHospitalization",
                "PriorCarbapenem",
                "PriorNonCarbapenem",
                "MeropenemResistance_susceptible",
                "MeropenemResistance_nonsusceptible",
                "ClinicalESBL",
            ]
        );
    }

    #[test]
    fn combination_schema_uses_synthetic_class() {
        let schema = FeatureSchema::new(
            Target::Combination(Combination::PiptazOrTobramycin),
            ClassTag::Combined(CombinedClass::PenicillinOrAmg),
            &EncoderOptions::default(),
        );
        let names = schema.names();
        assert!(names.contains(&"PriorPenicillin_or_AMG".to_string()));
        assert!(names.contains(&"PriorNonPenicillin_or_AMG".to_string()));
        assert!(names.contains(&"Piptaz_or_TobramycinResistance_nonsusceptible".to_string()));
    }

    #[test]
    fn alternate_modes_replace_columns() {
        let options = EncoderOptions {
            age: AgeEncoding::OneHot,
            acquisition: AcquisitionEncoding::IcuExposure,
            ..Default::default()
        };
        let schema = FeatureSchema::new(
            Target::Single(Antibiotic::Piptaz),
            ClassTag::Class(AntibioticClass::Penicillin),
            &options,
        );
        let names = schema.names();
        assert_eq!(schema.len(), 12 + 1 + 1 + 7);
        assert!(!names.contains(&"Age".to_string()));
        assert_eq!(names[0], "Age_<40");
        assert_eq!(names[11], "Age_>90");
        assert!(names.contains(&"ICUExposure".to_string()));
        assert!(!names.contains(&"acquisition_ward".to_string()));
    }
}
