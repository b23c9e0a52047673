//! Record builders shared by the engine's unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    BloodPressure, Clearance, ConsultationRecord, LabResult, Patient, VitalRecord,
};

/// Noon on the given day of January 2026.
pub fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn patient(id: &str, department: &str) -> Patient {
    Patient::new(id, Some(&format!("Patient {id}")), Some(department))
}

pub fn vital_bp(id: &str, observed: NaiveDateTime, systolic: f64, diastolic: f64) -> VitalRecord {
    VitalRecord {
        patient_id: id.into(),
        observed_at: Some(observed),
        blood_pressure: BloodPressure::new(systolic, diastolic),
        bmi: None,
    }
}

pub fn vital_bmi(id: &str, observed: NaiveDateTime, bmi: f64) -> VitalRecord {
    VitalRecord {
        patient_id: id.into(),
        observed_at: Some(observed),
        blood_pressure: None,
        bmi: Some(bmi),
    }
}

pub fn lab(id: &str, observed: NaiveDateTime) -> LabResult {
    LabResult {
        patient_id: id.into(),
        observed_at: Some(observed),
        ldl: None,
        hba1c: None,
    }
}

pub fn lab_ldl(id: &str, observed: NaiveDateTime, ldl: f64) -> LabResult {
    LabResult {
        ldl: Some(ldl),
        ..lab(id, observed)
    }
}

pub fn lab_hba1c(id: &str, observed: NaiveDateTime, hba1c: f64) -> LabResult {
    LabResult {
        hba1c: Some(hba1c),
        ..lab(id, observed)
    }
}

pub fn consult(
    id: &str,
    observed: NaiveDateTime,
    clearance: Option<Clearance>,
    chronic: Option<&str>,
) -> ConsultationRecord {
    ConsultationRecord {
        patient_id: id.into(),
        observed_at: Some(observed),
        clearance,
        chronic_risk_factor: chronic.map(str::to_string),
    }
}
