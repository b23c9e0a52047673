use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use super::fields::{as_text, into_row, parse_key, parse_measurement, parse_timestamp, pick};

/// A laboratory result row, normalized at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct LabResult {
    pub patient_id: String,
    pub observed_at: Option<NaiveDateTime>,
    /// LDL cholesterol, mg/dL.
    pub ldl: Option<f64>,
    /// Glycated haemoglobin, %.
    pub hba1c: Option<f64>,
}

const PATIENT_KEYS: &[&str] = &["patientId", "patient_id"];
const OBSERVED_AT_KEYS: &[&str] = &["observedAt", "test_date", "testDate", "created_at"];
const LDL_KEYS: &[&str] = &["ldl", "ldl_cholesterol", "ldlCholesterol"];
const HBA1C_KEYS: &[&str] = &["hba1c", "hbA1c", "hb_a1c", "HbA1c"];

impl From<Value> for LabResult {
    fn from(value: Value) -> Self {
        let row = into_row(value);
        Self {
            patient_id: parse_key(pick(&row, PATIENT_KEYS)).unwrap_or_default(),
            observed_at: parse_timestamp(as_text(pick(&row, OBSERVED_AT_KEYS))),
            ldl: parse_measurement(pick(&row, LDL_KEYS)),
            hba1c: parse_measurement(pick(&row, HBA1C_KEYS)),
        }
    }
}
