use axum::Json;
use axum::extract::State;
use serde::Serialize;

use gnr_core::models::antibiotic::{Antibiotic, AntibioticClass};
use gnr_core::models::snapshot::{
    AcquisitionSetting, AdmittingService, AgeBucket, Hospital, ResistanceHistory, SeverityCutoff,
    Sex,
};
use gnr_report::table::display_label;

use crate::error::ApiError;
use crate::state::AppState;

/// A selectable value and the text shown for it. `value` is exactly what
/// the snapshot field accepts.
#[derive(Serialize)]
pub struct FormOption {
    value: serde_json::Value,
    label: String,
}

/// One snapshot field as the form presents it.
#[derive(Serialize)]
pub struct FormField {
    /// Snapshot field this input fills.
    field: &'static str,
    label: &'static str,
    /// Definition shown next to the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static str>,
}

const fn field(field: &'static str, label: &'static str, help: Option<&'static str>) -> FormField {
    FormField { field, label, help }
}

static FIELDS: [FormField; 10] = [
    field("hospital", "Hospital:", None),
    field(
        "age_bucket",
        "Age:",
        Some("Age at the time of index culture collection"),
    ),
    field(
        "sex",
        "Sex:",
        Some(
            "Sex in EMR at time of: index encounter (TOH/THP) OR index culture collection (SHSC)",
        ),
    ),
    field(
        "acquisition_setting",
        "Acquisition:",
        Some(
            "Community: index culture within first 48 hours of admission or while in ED prior \
             to admit. Hospital: index culture >=48 hours after admit. ICU: index culture \
             >=48 hours after admit to ICU.",
        ),
    ),
    field(
        "recent_hospitalization",
        "Recent hospitalization:",
        Some(
            "Hospitalization (separate) within 90 days prior to: index culture collection \
             date (TOH/THP) OR present admission date (SHSC)",
        ),
    ),
    field(
        "admitting_service",
        "Admitting service:",
        Some("Admitting hospital service for index admission"),
    ),
    field(
        "prior_class_exposure",
        "Antimicrobial exposures",
        Some(
            "Antibiotic exposure in the last 90 days to 48 hours prior to the time of index \
             culture order (SHSC) or date (TOH/THP). Only inpatient antibiotics (SHSC) OR \
             inpatient/outpatient antibiotics in EMR (TOH/THP).",
        ),
    ),
    field(
        "prior_resistance_history",
        "Gram negative susceptibility history",
        Some(
            "Most recent Gram-negative organism from clinical culture in last 72 hours to \
             90 days prior to culture collection date",
        ),
    ),
    field(
        "clinical_esbl",
        "Clinical ESBL:",
        Some(
            "Clinical (non-screening culture) for ESBL within 3 days to 12 months prior to \
             index culture collection date",
        ),
    ),
    field(
        "severity_cutoff",
        "Clinical severity (affects 80 vs 90% cutoff):",
        None,
    ),
];

#[derive(Serialize)]
pub struct HospitalOption {
    #[serde(flatten)]
    option: FormOption,
    /// Every configured target has a model for this site.
    available: bool,
}

#[derive(Serialize)]
pub struct FormDescription {
    fields: &'static [FormField],
    hospitals: Vec<HospitalOption>,
    age_buckets: Vec<FormOption>,
    sexes: Vec<FormOption>,
    acquisition_settings: Vec<FormOption>,
    admitting_services: Vec<FormOption>,
    antibiotic_classes: Vec<FormOption>,
    tracked_antibiotics: Vec<FormOption>,
    resistance_states: Vec<FormOption>,
    severity_cutoffs: Vec<FormOption>,
    targets: Vec<FormOption>,
}

fn option(value: impl Serialize, label: impl Into<String>) -> Result<FormOption, ApiError> {
    let value = serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(FormOption {
        value,
        label: label.into(),
    })
}

/// Everything the input form offers, plus which sites can be assessed.
pub async fn describe_form(
    State(state): State<AppState>,
) -> Result<Json<FormDescription>, ApiError> {
    let targets = state.encoder.targets();
    let covered = state.registry.hospitals_covering(targets);

    let hospitals = Hospital::ALL
        .into_iter()
        .map(|h| -> Result<HospitalOption, ApiError> {
            Ok(HospitalOption {
                option: option(h, h.id())?,
                available: covered.contains(&h),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(FormDescription {
        fields: &FIELDS,
        hospitals,
        age_buckets: AgeBucket::ALL
            .into_iter()
            .map(|b| option(b, b.label()))
            .collect::<Result<_, _>>()?,
        sexes: vec![option(Sex::Male, "Male")?, option(Sex::Female, "Female")?],
        acquisition_settings: [
            AcquisitionSetting::Community,
            AcquisitionSetting::HospitalWard,
            AcquisitionSetting::Icu,
        ]
        .into_iter()
        .map(|a| option(a, a.label()))
        .collect::<Result<_, _>>()?,
        admitting_services: vec![
            option(AdmittingService::Medical, "Medical")?,
            option(AdmittingService::Surgical, "Surgical")?,
        ],
        antibiotic_classes: AntibioticClass::ALL
            .into_iter()
            .map(|c| option(c, c.name()))
            .collect::<Result<_, _>>()?,
        tracked_antibiotics: Antibiotic::ALL
            .into_iter()
            .map(|a| option(a, a.name()))
            .collect::<Result<_, _>>()?,
        resistance_states: ResistanceHistory::ALL
            .into_iter()
            .map(|r| option(r, r.label()))
            .collect::<Result<_, _>>()?,
        severity_cutoffs: [SeverityCutoff::Eighty, SeverityCutoff::Ninety]
            .into_iter()
            .map(|c| option(c, format!("qSOFA {}", c.qsofa_label())))
            .collect::<Result<_, _>>()?,
        targets: targets
            .iter()
            .map(|&t| option(t, display_label(t)))
            .collect::<Result<_, _>>()?,
    }))
}
