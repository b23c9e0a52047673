use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{
    as_text, into_row, parse_blood_pressure_text, parse_key, parse_measurement, parse_timestamp,
    pick,
};

/// A validated blood pressure reading in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

impl BloodPressure {
    /// Both values must be finite and positive, otherwise the reading is absent.
    pub fn new(systolic: f64, diastolic: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(systolic) && valid(diastolic)).then_some(Self { systolic, diastolic })
    }
}

/// Blood pressure as it arrives upstream: two numeric columns, one
/// `"systolic/diastolic"` text column, or nothing usable.
#[derive(Debug, Clone, PartialEq)]
pub enum BloodPressureInput {
    Numeric { systolic: f64, diastolic: f64 },
    Text(String),
    Absent,
}

impl BloodPressureInput {
    /// Explicit numeric columns win when both are valid; text is the fallback.
    pub fn from_fields(systolic: Option<f64>, diastolic: Option<f64>, text: Option<&str>) -> Self {
        match (systolic, diastolic, text) {
            (Some(systolic), Some(diastolic), _) => Self::Numeric { systolic, diastolic },
            (_, _, Some(text)) if !text.trim().is_empty() => Self::Text(text.to_string()),
            _ => Self::Absent,
        }
    }

    pub fn resolve(&self) -> Option<BloodPressure> {
        match self {
            Self::Numeric { systolic, diastolic } => BloodPressure::new(*systolic, *diastolic),
            Self::Text(text) => parse_blood_pressure_text(text),
            Self::Absent => None,
        }
    }
}

/// A vital-signs row, normalized at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct VitalRecord {
    pub patient_id: String,
    /// `None` when the upstream timestamp was missing or unparsable.
    pub observed_at: Option<NaiveDateTime>,
    pub blood_pressure: Option<BloodPressure>,
    pub bmi: Option<f64>,
}

const PATIENT_KEYS: &[&str] = &["patientId", "patient_id"];
const OBSERVED_AT_KEYS: &[&str] = &["observedAt", "recorded_at", "recordedAt", "created_at"];
const BLOOD_PRESSURE_TEXT_KEYS: &[&str] = &[
    "bloodPressureText",
    "blood_pressure_text",
    "blood_pressure",
    "bloodPressure",
    "bp",
];

impl From<Value> for VitalRecord {
    fn from(value: Value) -> Self {
        let row = into_row(value);
        let blood_pressure = BloodPressureInput::from_fields(
            parse_measurement(pick(&row, &["systolic"])),
            parse_measurement(pick(&row, &["diastolic"])),
            as_text(pick(&row, BLOOD_PRESSURE_TEXT_KEYS)),
        )
        .resolve();

        Self {
            patient_id: parse_key(pick(&row, PATIENT_KEYS)).unwrap_or_default(),
            observed_at: parse_timestamp(as_text(pick(&row, OBSERVED_AT_KEYS))),
            blood_pressure,
            bmi: parse_measurement(pick(&row, &["bmi"])),
        }
    }
}
