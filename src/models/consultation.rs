use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use super::enums::Clearance;
use super::fields::{as_text, into_row, non_blank, parse_key, parse_timestamp, pick};

/// A consultation row, normalized at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ConsultationRecord {
    pub patient_id: String,
    pub observed_at: Option<NaiveDateTime>,
    /// Clinician judgment; unknown text is treated as absent.
    pub clearance: Option<Clearance>,
    /// Free text, possibly comma-delimited. Normalized by the chronic-factor stage.
    pub chronic_risk_factor: Option<String>,
}

const PATIENT_KEYS: &[&str] = &["patientId", "patient_id", "employee_id", "employeeId"];
const OBSERVED_AT_KEYS: &[&str] = &[
    "observedAt",
    "consultation_date",
    "consultationDate",
    "created_at",
];
const CLEARANCE_KEYS: &[&str] = &["clearance", "medical_clearance", "medicalClearance"];
const CHRONIC_FACTOR_KEYS: &[&str] = &[
    "chronicRiskFactor",
    "chronic_risk_factor",
    "chronic_risk_factors",
    "chronicRiskFactors",
];

impl From<Value> for ConsultationRecord {
    fn from(value: Value) -> Self {
        let row = into_row(value);
        Self {
            patient_id: parse_key(pick(&row, PATIENT_KEYS)).unwrap_or_default(),
            observed_at: parse_timestamp(as_text(pick(&row, OBSERVED_AT_KEYS))),
            clearance: as_text(pick(&row, CLEARANCE_KEYS)).and_then(Clearance::parse),
            chronic_risk_factor: non_blank(as_text(pick(&row, CHRONIC_FACTOR_KEYS))),
        }
    }
}
