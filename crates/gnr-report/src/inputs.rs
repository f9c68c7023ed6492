use serde::Serialize;
use ts_rs::TS;

use gnr_core::models::antibiotic::{Antibiotic, AntibioticClass};
use gnr_core::models::snapshot::{AdmittingService, ClinicalInputSnapshot, Sex};

/// One submitted value, echoed back next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct InputRow {
    pub input: String,
    pub value: String,
}

fn row(input: impl Into<String>, value: impl Into<String>) -> InputRow {
    InputRow {
        input: input.into(),
        value: value.into(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// The snapshot as labelled rows, ending with the qSOFA band the
/// threshold came from.
pub fn input_rows(snapshot: &ClinicalInputSnapshot) -> Vec<InputRow> {
    let mut rows = vec![
        row("Hospital:", snapshot.hospital.id()),
        row("Age:", snapshot.age_bucket.label()),
        row(
            "Sex:",
            match snapshot.sex {
                Sex::Male => "Male",
                Sex::Female => "Female",
            },
        ),
        row("Acquisition:", snapshot.acquisition_setting.label()),
        row(
            "Admitting service:",
            match snapshot.admitting_service {
                AdmittingService::Medical => "Medical",
                AdmittingService::Surgical => "Surgical",
            },
        ),
        row(
            "Recent hospitalization:",
            yes_no(snapshot.recent_hospitalization),
        ),
        row("Clinical ESBL:", yes_no(snapshot.clinical_esbl)),
    ];

    rows.extend(AntibioticClass::ALL.into_iter().filter_map(|class| {
        snapshot
            .exposure(class)
            .map(|exposed| row(format!("Prior {}:", class.name()), yes_no(exposed)))
    }));

    rows.extend(Antibiotic::ALL.into_iter().filter_map(|antibiotic| {
        snapshot.resistance(antibiotic).map(|history| {
            row(
                format!("Prior {} resistance:", antibiotic.name().to_lowercase()),
                history.label(),
            )
        })
    }));

    rows.push(row("qSOFA:", snapshot.severity_cutoff.qsofa_label()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnr_core::models::snapshot::{
        AcquisitionSetting, AgeBucket, Hospital, ResistanceHistory, SeverityCutoff,
    };

    #[test]
    fn echoes_every_submitted_value() {
        let snapshot = ClinicalInputSnapshot {
            hospital: Hospital::Sunnybrook,
            age_bucket: AgeBucket::Under40,
            sex: Sex::Female,
            acquisition_setting: AcquisitionSetting::HospitalWard,
            admitting_service: AdmittingService::Surgical,
            recent_hospitalization: true,
            clinical_esbl: false,
            prior_class_exposure: [(AntibioticClass::Fq, true), (AntibioticClass::Amg, false)]
                .into_iter()
                .collect(),
            prior_resistance_history: [(Antibiotic::Piptaz, ResistanceHistory::Nonsusceptible)]
                .into_iter()
                .collect(),
            severity_cutoff: SeverityCutoff::Ninety,
        };

        let rows = input_rows(&snapshot);
        let find = |input: &str| {
            rows.iter()
                .find(|r| r.input == input)
                .map(|r| r.value.as_str())
        };

        assert_eq!(find("Hospital:"), Some("Sunnybrook"));
        assert_eq!(find("Acquisition:"), Some("Hospital non-ICU"));
        assert_eq!(find("Recent hospitalization:"), Some("Yes"));
        assert_eq!(find("Prior fluoroquinolone:"), Some("Yes"));
        assert_eq!(find("Prior aminoglycoside:"), Some("No"));
        assert_eq!(find("Prior penicillin:"), None);
        assert_eq!(
            find("Prior piperacillin-tazobactam resistance:"),
            Some("Nonsusceptible")
        );
        assert_eq!(rows.last().map(|r| r.value.as_str()), Some("3 or vasopressors"));
    }
}
