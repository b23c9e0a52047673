//! Per-stream threshold classification.
//!
//! Every threshold is a strict `>` comparison against the constants below.
//! A stream can raise several signals at once (vitals flag BP and BMI
//! independently); each carries its own factor text.

use crate::models::{
    BloodPressure, Clearance, ConsultationRecord, LabResult, RiskLevel, VitalRecord,
};

use super::helpers::format_measurement;
use super::types::{RiskSignal, SignalSource};

pub const SYSTOLIC_CRITICAL: f64 = 160.0;
pub const DIASTOLIC_CRITICAL: f64 = 100.0;
pub const SYSTOLIC_AT_RISK: f64 = 140.0;
pub const DIASTOLIC_AT_RISK: f64 = 90.0;

pub const BMI_CRITICAL: f64 = 35.0;
pub const BMI_AT_RISK: f64 = 30.0;

pub const LDL_CRITICAL: f64 = 160.0;
pub const LDL_AT_RISK: f64 = 130.0;

pub const HBA1C_CRITICAL: f64 = 8.0;
pub const HBA1C_AT_RISK: f64 = 6.5;

/// Result of classifying one latest record: the strongest severity it raised
/// and the factor text of every severity-bearing signal. This is the unit the
/// merge folds over.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub severity: RiskLevel,
    pub factors: Vec<String>,
}

impl Classification {
    pub fn from_signals(signals: &[RiskSignal]) -> Self {
        Self {
            severity: signals
                .iter()
                .map(|s| s.severity)
                .max()
                .unwrap_or_default(),
            factors: signals.iter().map(|s| s.factor.clone()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold predicates
// ---------------------------------------------------------------------------

pub fn blood_pressure_severity(bp: &BloodPressure) -> RiskLevel {
    if bp.systolic > SYSTOLIC_CRITICAL || bp.diastolic > DIASTOLIC_CRITICAL {
        RiskLevel::Critical
    } else if bp.systolic > SYSTOLIC_AT_RISK || bp.diastolic > DIASTOLIC_AT_RISK {
        RiskLevel::AtRisk
    } else {
        RiskLevel::Normal
    }
}

fn banded(value: f64, critical: f64, at_risk: f64) -> RiskLevel {
    if value > critical {
        RiskLevel::Critical
    } else if value > at_risk {
        RiskLevel::AtRisk
    } else {
        RiskLevel::Normal
    }
}

pub fn bmi_severity(bmi: f64) -> RiskLevel {
    banded(bmi, BMI_CRITICAL, BMI_AT_RISK)
}

pub fn ldl_severity(ldl: f64) -> RiskLevel {
    banded(ldl, LDL_CRITICAL, LDL_AT_RISK)
}

pub fn hba1c_severity(hba1c: f64) -> RiskLevel {
    banded(hba1c, HBA1C_CRITICAL, HBA1C_AT_RISK)
}

pub fn clearance_severity(clearance: Clearance) -> RiskLevel {
    RiskLevel::from(clearance)
}

// ---------------------------------------------------------------------------
// Per-stream signals
// ---------------------------------------------------------------------------

fn signal(source: SignalSource, severity: RiskLevel, factor: String) -> Option<RiskSignal> {
    severity.is_elevated().then_some(RiskSignal {
        source,
        severity,
        factor,
    })
}

/// BP and BMI signals from a patient's latest vitals row.
pub fn vital_signals(vital: &VitalRecord) -> Vec<RiskSignal> {
    let bp = vital.blood_pressure.and_then(|bp| {
        signal(
            SignalSource::Vitals,
            blood_pressure_severity(&bp),
            format!(
                "BP: {}/{}",
                format_measurement(bp.systolic),
                format_measurement(bp.diastolic)
            ),
        )
    });
    let bmi = vital.bmi.and_then(|bmi| {
        signal(
            SignalSource::Vitals,
            bmi_severity(bmi),
            format!("BMI: {}", format_measurement(bmi)),
        )
    });
    bp.into_iter().chain(bmi).collect()
}

/// LDL and HbA1c signals from a patient's latest lab row.
pub fn lab_signals(lab: &LabResult) -> Vec<RiskSignal> {
    let ldl = lab.ldl.and_then(|ldl| {
        signal(
            SignalSource::Lab,
            ldl_severity(ldl),
            format!("LDL: {}", format_measurement(ldl)),
        )
    });
    let hba1c = lab.hba1c.and_then(|hba1c| {
        signal(
            SignalSource::Lab,
            hba1c_severity(hba1c),
            format!("HbA1c: {}", format_measurement(hba1c)),
        )
    });
    ldl.into_iter().chain(hba1c).collect()
}

/// Clearance signal from a patient's latest consultation.
pub fn consultation_signals(consultation: &ConsultationRecord) -> Vec<RiskSignal> {
    consultation
        .clearance
        .and_then(|clearance| {
            signal(
                SignalSource::Consultation,
                clearance_severity(clearance),
                format!("Clearance: {}", clearance.label()),
            )
        })
        .into_iter()
        .collect()
}

pub fn classify_vitals(vital: &VitalRecord) -> Classification {
    Classification::from_signals(&vital_signals(vital))
}

pub fn classify_lab(lab: &LabResult) -> Classification {
    Classification::from_signals(&lab_signals(lab))
}

pub fn classify_consultation(consultation: &ConsultationRecord) -> Classification {
    Classification::from_signals(&consultation_signals(consultation))
}

// ---------------------------------------------------------------------------
// KPI predicates (scalar counters, outside the merge)
// ---------------------------------------------------------------------------

pub fn is_hypertensive(vital: &VitalRecord) -> bool {
    vital
        .blood_pressure
        .is_some_and(|bp| blood_pressure_severity(&bp).is_elevated())
}

pub fn is_obese(vital: &VitalRecord) -> bool {
    vital.bmi.is_some_and(|bmi| bmi > BMI_AT_RISK)
}

pub fn has_critical_ldl(lab: &LabResult) -> bool {
    lab.ldl.is_some_and(|ldl| ldl > LDL_CRITICAL)
}

pub fn is_diabetic_watch(lab: &LabResult) -> bool {
    lab.hba1c.is_some_and(|hba1c| hba1c > HBA1C_AT_RISK)
}
