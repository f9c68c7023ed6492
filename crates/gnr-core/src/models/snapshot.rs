use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::antibiotic::{Antibiotic, AntibioticClass};
use crate::error::CoreError;

/// Hospital site. Each site has its own fitted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Hospital {
    Sunnybrook,
    #[serde(rename = "TOH")]
    Toh,
    /// No fitted models yet.
    Trillium,
}

impl Hospital {
    pub const ALL: [Hospital; 3] = [Hospital::Sunnybrook, Hospital::Toh, Hospital::Trillium];

    pub fn id(&self) -> &'static str {
        match self {
            Hospital::Sunnybrook => "Sunnybrook",
            Hospital::Toh => "TOH",
            Hospital::Trillium => "Trillium",
        }
    }
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Hospital {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hospital::ALL
            .into_iter()
            .find(|h| h.id() == s)
            .ok_or_else(|| CoreError::unknown("hospital", s))
    }
}

/// Age at index culture collection, in the bins the models were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AgeBucket {
    #[serde(rename = "<40")]
    Under40,
    #[serde(rename = "40-44")]
    From40To44,
    #[serde(rename = "45-49")]
    From45To49,
    #[serde(rename = "50-54")]
    From50To54,
    #[serde(rename = "55-59")]
    From55To59,
    #[serde(rename = "60-64")]
    From60To64,
    #[serde(rename = "65-69")]
    From65To69,
    #[serde(rename = "70-74")]
    From70To74,
    #[serde(rename = "75-79")]
    From75To79,
    #[serde(rename = "80-84")]
    From80To84,
    #[serde(rename = "85-89")]
    From85To89,
    #[serde(rename = ">90")]
    Over90,
}

impl AgeBucket {
    /// All buckets in ascending order.
    pub const ALL: [AgeBucket; 12] = [
        AgeBucket::Under40,
        AgeBucket::From40To44,
        AgeBucket::From45To49,
        AgeBucket::From50To54,
        AgeBucket::From55To59,
        AgeBucket::From60To64,
        AgeBucket::From65To69,
        AgeBucket::From70To74,
        AgeBucket::From75To79,
        AgeBucket::From80To84,
        AgeBucket::From85To89,
        AgeBucket::Over90,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under40 => "<40",
            AgeBucket::From40To44 => "40-44",
            AgeBucket::From45To49 => "45-49",
            AgeBucket::From50To54 => "50-54",
            AgeBucket::From55To59 => "55-59",
            AgeBucket::From60To64 => "60-64",
            AgeBucket::From65To69 => "65-69",
            AgeBucket::From70To74 => "70-74",
            AgeBucket::From75To79 => "75-79",
            AgeBucket::From80To84 => "80-84",
            AgeBucket::From85To89 => "85-89",
            AgeBucket::Over90 => ">90",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Male,
    Female,
}

/// Where the index culture was acquired.
///
/// Community: within 48 hours of admission or in the ED. Hospital ward and
/// ICU: 48 hours or more after admission to that setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AcquisitionSetting {
    Community,
    HospitalWard,
    Icu,
}

impl AcquisitionSetting {
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionSetting::Community => "Community",
            AcquisitionSetting::HospitalWard => "Hospital non-ICU",
            AcquisitionSetting::Icu => "ICU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AdmittingService {
    Medical,
    Surgical,
}

/// Most recent prior Gram-negative isolate result for one antibiotic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResistanceHistory {
    #[default]
    NoIsolateOrUnknown,
    Susceptible,
    Nonsusceptible,
}

impl ResistanceHistory {
    pub const ALL: [ResistanceHistory; 3] = [
        ResistanceHistory::NoIsolateOrUnknown,
        ResistanceHistory::Susceptible,
        ResistanceHistory::Nonsusceptible,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResistanceHistory::NoIsolateOrUnknown => "No previous/Unknown",
            ResistanceHistory::Susceptible => "Susceptible",
            ResistanceHistory::Nonsusceptible => "Nonsusceptible",
        }
    }
}

/// Susceptibility threshold drawn on the chart, picked from clinical
/// severity: 80% when qSOFA is 0-2, 90% when qSOFA is 3 or the patient is on
/// vasopressors. Never part of the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeverityCutoff {
    #[default]
    Eighty,
    Ninety,
}

impl SeverityCutoff {
    pub fn percent(&self) -> u8 {
        match self {
            SeverityCutoff::Eighty => 80,
            SeverityCutoff::Ninety => 90,
        }
    }

    pub fn qsofa_label(&self) -> &'static str {
        match self {
            SeverityCutoff::Eighty => "0-2",
            SeverityCutoff::Ninety => "3 or vasopressors",
        }
    }
}

impl TryFrom<u8> for SeverityCutoff {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            80 => Ok(SeverityCutoff::Eighty),
            90 => Ok(SeverityCutoff::Ninety),
            other => Err(CoreError::unknown("severity cutoff", other.to_string())),
        }
    }
}

impl From<SeverityCutoff> for u8 {
    fn from(cutoff: SeverityCutoff) -> Self {
        cutoff.percent()
    }
}

/// Everything the clinician entered for one prediction request.
///
/// Built fresh per submission and only read during encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalInputSnapshot {
    pub hospital: Hospital,
    pub age_bucket: AgeBucket,
    pub sex: Sex,
    pub acquisition_setting: AcquisitionSetting,
    pub admitting_service: AdmittingService,
    pub recent_hospitalization: bool,
    pub clinical_esbl: bool,
    /// Exposure to each class in the 90-day to 48-hour lookback window.
    pub prior_class_exposure: BTreeMap<AntibioticClass, bool>,
    /// Most recent prior isolate per tracked antibiotic.
    pub prior_resistance_history: BTreeMap<Antibiotic, ResistanceHistory>,
    #[serde(default)]
    #[ts(type = "80 | 90")]
    pub severity_cutoff: SeverityCutoff,
}

impl ClinicalInputSnapshot {
    pub fn exposure(&self, class: AntibioticClass) -> Option<bool> {
        self.prior_class_exposure.get(&class).copied()
    }

    pub fn resistance(&self, antibiotic: Antibiotic) -> Option<ResistanceHistory> {
        self.prior_resistance_history.get(&antibiotic).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bucket_labels_round_trip_in_order() {
        let parsed: Vec<AgeBucket> =
            serde_json::from_str(r#"["<40", "40-44", "80-84", ">90"]"#).expect("known labels");
        assert_eq!(
            parsed,
            vec![
                AgeBucket::Under40,
                AgeBucket::From40To44,
                AgeBucket::From80To84,
                AgeBucket::Over90
            ]
        );
        assert!(AgeBucket::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(serde_json::from_str::<AgeBucket>(r#""90+""#).is_err());
        assert!(AgeBucket::ALL.iter().all(|b| b.to_string() == b.label()));
    }

    #[test]
    fn severity_cutoff_accepts_only_80_and_90() {
        let c: SeverityCutoff = serde_json::from_str("90").expect("valid cutoff");
        assert_eq!(c, SeverityCutoff::Ninety);
        assert_eq!(serde_json::to_string(&SeverityCutoff::Eighty).unwrap(), "80");
        assert!(serde_json::from_str::<SeverityCutoff>("85").is_err());
    }

    #[test]
    fn hospital_ids_parse_and_reject_unknown_sites() {
        assert_eq!("TOH".parse::<Hospital>().unwrap(), Hospital::Toh);
        assert_eq!("Trillium".parse::<Hospital>().unwrap(), Hospital::Trillium);
        let err = "Toh".parse::<Hospital>().unwrap_err();
        assert_eq!(err.to_string(), "unknown hospital: Toh");
    }

    #[test]
    fn snapshot_deserializes_from_form_json() {
        let json = r#"{
            "hospital": "TOH",
            "age_bucket": "80-84",
            "sex": "female",
            "acquisition_setting": "hospital_ward",
            "admitting_service": "surgical",
            "recent_hospitalization": true,
            "clinical_esbl": false,
            "prior_class_exposure": {"Penicillin": false, "FQ": true},
            "prior_resistance_history": {"Meropenem": "susceptible", "TMPSMX": "nonsusceptible"}
        }"#;
        let snapshot: ClinicalInputSnapshot = serde_json::from_str(json).expect("valid snapshot");
        assert_eq!(snapshot.hospital, Hospital::Toh);
        assert_eq!(snapshot.age_bucket, AgeBucket::From80To84);
        assert_eq!(snapshot.exposure(AntibioticClass::Fq), Some(true));
        assert_eq!(snapshot.exposure(AntibioticClass::Amg), None);
        assert_eq!(
            snapshot.resistance(Antibiotic::Tmpsmx),
            Some(ResistanceHistory::Nonsusceptible)
        );
        assert_eq!(snapshot.severity_cutoff, SeverityCutoff::Eighty);
    }
}
