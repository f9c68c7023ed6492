use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A single antibiotic a model can be fitted for.
///
/// The serialized identifiers are the ones the fitted artifacts and their
/// feature columns use (`MeropenemResistance_susceptible`, `TMPSMX_TOH.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Antibiotic {
    Meropenem,
    Piptaz,
    Ceftazidime,
    Ceftriaxone,
    Ciprofloxacin,
    Cefazolin,
    Tobramycin,
    #[serde(rename = "TMPSMX")]
    Tmpsmx,
}

impl Antibiotic {
    pub const ALL: [Antibiotic; 8] = [
        Antibiotic::Meropenem,
        Antibiotic::Piptaz,
        Antibiotic::Ceftazidime,
        Antibiotic::Ceftriaxone,
        Antibiotic::Ciprofloxacin,
        Antibiotic::Cefazolin,
        Antibiotic::Tobramycin,
        Antibiotic::Tmpsmx,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Antibiotic::Meropenem => "Meropenem",
            Antibiotic::Piptaz => "Piptaz",
            Antibiotic::Ceftazidime => "Ceftazidime",
            Antibiotic::Ceftriaxone => "Ceftriaxone",
            Antibiotic::Ciprofloxacin => "Ciprofloxacin",
            Antibiotic::Cefazolin => "Cefazolin",
            Antibiotic::Tobramycin => "Tobramycin",
            Antibiotic::Tmpsmx => "TMPSMX",
        }
    }

    /// Full drug name shown next to form inputs.
    pub fn name(&self) -> &'static str {
        match self {
            Antibiotic::Meropenem => "Meropenem",
            Antibiotic::Piptaz => "Piperacillin-tazobactam",
            Antibiotic::Ceftazidime => "Ceftazidime",
            Antibiotic::Ceftriaxone => "Ceftriaxone",
            Antibiotic::Ciprofloxacin => "Ciprofloxacin",
            Antibiotic::Cefazolin => "Cefazolin",
            Antibiotic::Tobramycin => "Tobramycin",
            Antibiotic::Tmpsmx => "Trimethoprim-sulfamethoxazole",
        }
    }
}

impl fmt::Display for Antibiotic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Antibiotic class used for prior-exposure inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AntibioticClass {
    Penicillin,
    Cephalosporin,
    Carbapenem,
    #[serde(rename = "FQ")]
    Fq,
    #[serde(rename = "AMG")]
    Amg,
    OtherAbx,
}

impl AntibioticClass {
    pub const ALL: [AntibioticClass; 6] = [
        AntibioticClass::Penicillin,
        AntibioticClass::Cephalosporin,
        AntibioticClass::Carbapenem,
        AntibioticClass::Fq,
        AntibioticClass::Amg,
        AntibioticClass::OtherAbx,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AntibioticClass::Penicillin => "Penicillin",
            AntibioticClass::Cephalosporin => "Cephalosporin",
            AntibioticClass::Carbapenem => "Carbapenem",
            AntibioticClass::Fq => "FQ",
            AntibioticClass::Amg => "AMG",
            AntibioticClass::OtherAbx => "OtherAbx",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AntibioticClass::Penicillin => "penicillin",
            AntibioticClass::Cephalosporin => "cephalosporin",
            AntibioticClass::Carbapenem => "carbapenem",
            AntibioticClass::Fq => "fluoroquinolone",
            AntibioticClass::Amg => "aminoglycoside",
            AntibioticClass::OtherAbx => "other class",
        }
    }
}

impl fmt::Display for AntibioticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Combination therapies with their own fitted model but no inputs of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Combination {
    /// Piperacillin-tazobactam and tobramycin given together.
    #[serde(rename = "Piptaz_or_Tobramycin")]
    PiptazOrTobramycin,
}

impl Combination {
    pub const ALL: [Combination; 1] = [Combination::PiptazOrTobramycin];

    pub fn id(&self) -> &'static str {
        match self {
            Combination::PiptazOrTobramycin => "Piptaz_or_Tobramycin",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Combination::PiptazOrTobramycin => "Piperacillin-tazobactam and tobramycin",
        }
    }

    /// The single antibiotics whose histories the combination is derived from.
    pub fn components(&self) -> [Antibiotic; 2] {
        match self {
            Combination::PiptazOrTobramycin => [Antibiotic::Piptaz, Antibiotic::Tobramycin],
        }
    }
}

/// A prediction target: one antibiotic or a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Target {
    Single(Antibiotic),
    Combination(Combination),
}

impl Target {
    pub fn id(&self) -> &'static str {
        match self {
            Target::Single(a) => a.id(),
            Target::Combination(c) => c.id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::Single(a) => a.name(),
            Target::Combination(c) => c.name(),
        }
    }

    pub fn is_combination(&self) -> bool {
        matches!(self, Target::Combination(_))
    }

    /// Every target a model can exist for.
    pub fn all() -> impl Iterator<Item = Target> {
        Antibiotic::ALL
            .into_iter()
            .map(Target::Single)
            .chain(Combination::ALL.into_iter().map(Target::Combination))
    }
}

impl From<Antibiotic> for Target {
    fn from(a: Antibiotic) -> Self {
        Target::Single(a)
    }
}

impl From<Combination> for Target {
    fn from(c: Combination) -> Self {
        Target::Combination(c)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::all()
            .find(|t| t.id() == s)
            .ok_or_else(|| CoreError::unknown("target", s))
    }
}

/// The class a target's "prior same class" feature refers to.
///
/// Combinations get a synthetic tag with no matching exposure input; it
/// only ever names feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ClassTag {
    Class(AntibioticClass),
    Combined(CombinedClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CombinedClass {
    #[serde(rename = "Penicillin_or_AMG")]
    PenicillinOrAmg,
}

impl ClassTag {
    pub fn id(&self) -> &'static str {
        match self {
            ClassTag::Class(c) => c.id(),
            ClassTag::Combined(CombinedClass::PenicillinOrAmg) => "Penicillin_or_AMG",
        }
    }

    /// The real exposure class, if this tag has one.
    pub fn exposure_class(&self) -> Option<AntibioticClass> {
        match self {
            ClassTag::Class(c) => Some(*c),
            ClassTag::Combined(_) => None,
        }
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
