use std::collections::BTreeMap;

use gnr_core::models::antibiotic::{
    Antibiotic, AntibioticClass, ClassTag, Combination, CombinedClass, Target,
};
use gnr_core::models::snapshot::AgeBucket;

/// Immutable lookup data the encoder reads: which class each target belongs
/// to, the numeric value of each age bucket, and which targets are served.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderTables {
    classes: BTreeMap<Target, ClassTag>,
    age_midpoints: BTreeMap<AgeBucket, f64>,
    targets: Vec<Target>,
}

impl EncoderTables {
    /// Tables the current models were fitted against.
    pub fn standard() -> Self {
        use AntibioticClass::*;

        let classes = [
            (Antibiotic::Cefazolin, Cephalosporin),
            (Antibiotic::Ceftriaxone, Cephalosporin),
            (Antibiotic::Ceftazidime, Cephalosporin),
            (Antibiotic::Piptaz, Penicillin),
            (Antibiotic::Meropenem, Carbapenem),
            (Antibiotic::Ciprofloxacin, Fq),
            (Antibiotic::Tobramycin, Amg),
            (Antibiotic::Tmpsmx, OtherAbx),
        ]
        .into_iter()
        .map(|(a, c)| (Target::Single(a), ClassTag::Class(c)))
        .chain([(
            Target::Combination(Combination::PiptazOrTobramycin),
            ClassTag::Combined(CombinedClass::PenicillinOrAmg),
        )])
        .collect();

        let midpoints = [
            30.0, 42.5, 47.5, 52.5, 57.5, 62.5, 67.5, 72.5, 77.5, 82.5, 87.5, 95.0,
        ];
        let age_midpoints = AgeBucket::ALL.into_iter().zip(midpoints).collect();

        let targets = vec![
            Target::Single(Antibiotic::Meropenem),
            Target::Single(Antibiotic::Piptaz),
            Target::Single(Antibiotic::Ceftazidime),
            Target::Single(Antibiotic::Ceftriaxone),
            Target::Single(Antibiotic::Ciprofloxacin),
            Target::Combination(Combination::PiptazOrTobramycin),
        ];

        Self {
            classes,
            age_midpoints,
            targets,
        }
    }

    pub fn new(
        classes: BTreeMap<Target, ClassTag>,
        age_midpoints: BTreeMap<AgeBucket, f64>,
        targets: Vec<Target>,
    ) -> Self {
        Self {
            classes,
            age_midpoints,
            targets,
        }
    }

    /// Replace the served target list, keeping its order.
    pub fn with_targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = targets;
        self
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_configured(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    pub fn class_of(&self, target: Target) -> Option<ClassTag> {
        self.classes.get(&target).copied()
    }

    pub fn age_midpoint(&self, bucket: AgeBucket) -> Option<f64> {
        self.age_midpoints.get(&bucket).copied()
    }
}

impl Default for EncoderTables {
    fn default() -> Self {
        Self::standard()
    }
}
