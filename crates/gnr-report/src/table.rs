use serde::Serialize;
use ts_rs::TS;

use gnr_core::models::antibiotic::{Antibiotic, Combination, Target};
use gnr_core::models::snapshot::SeverityCutoff;

use crate::assess::Susceptibility;

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SusceptibilityRow {
    pub target: Target,
    /// Short label shown to clinicians.
    pub antibiotic: String,
    /// Whole percent, rounded half to even.
    pub percent: u8,
    /// At or above the severity threshold.
    pub meets_cutoff: bool,
}

/// Short display label; long identifiers are abbreviated.
pub fn display_label(target: Target) -> &'static str {
    match target {
        Target::Single(Antibiotic::Piptaz) => "PipTazo",
        Target::Combination(Combination::PiptazOrTobramycin) => "PipTazo+Tobramycin",
        other => other.id(),
    }
}

/// Results sorted from most to least likely susceptible.
pub fn susceptibility_table(
    results: &[Susceptibility],
    cutoff: SeverityCutoff,
) -> Vec<SusceptibilityRow> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| b.percent.total_cmp(&a.percent));

    sorted
        .into_iter()
        .map(|s| {
            let percent = whole_percent(s.percent);
            SusceptibilityRow {
                target: s.target,
                antibiotic: display_label(s.target).to_string(),
                percent,
                meets_cutoff: percent >= cutoff.percent(),
            }
        })
        .collect()
}

fn whole_percent(percent: f64) -> u8 {
    percent.clamp(0.0, 100.0).round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(target: Target, percent: f64) -> Susceptibility {
        Susceptibility {
            target,
            probability: percent / 100.0,
            percent,
        }
    }

    #[test]
    fn sorted_descending_with_short_labels() {
        let results = [
            result(Target::Single(Antibiotic::Piptaz), 71.2),
            result(Target::Single(Antibiotic::Meropenem), 96.8),
            result(Target::Combination(Combination::PiptazOrTobramycin), 88.4),
        ];
        let rows = susceptibility_table(&results, SeverityCutoff::Eighty);
        let labels: Vec<&str> = rows.iter().map(|r| r.antibiotic.as_str()).collect();
        assert_eq!(labels, ["Meropenem", "PipTazo+Tobramycin", "PipTazo"]);
        assert_eq!(rows[0].percent, 97);
        assert!(rows[1].meets_cutoff);
        assert!(!rows[2].meets_cutoff);
    }

    #[test]
    fn cutoff_applies_to_rounded_percent() {
        let results = [result(Target::Single(Antibiotic::Ceftriaxone), 89.6)];
        let rows = susceptibility_table(&results, SeverityCutoff::Ninety);
        assert_eq!(rows[0].percent, 90);
        assert!(rows[0].meets_cutoff);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(whole_percent(82.5), 82);
        assert_eq!(whole_percent(83.5), 84);
        assert_eq!(whole_percent(100.0), 100);
    }
}
