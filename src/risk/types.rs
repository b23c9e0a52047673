use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{ConsultationRecord, LabResult, Patient, RiskLevel, VitalRecord};

use super::cohort::Cohort;

// ---------------------------------------------------------------------------
// ClinicalSnapshot: one immutable batch of the four upstream collections
// ---------------------------------------------------------------------------

/// Pre-fetched input for one computation.
/// The data-access layer resolves all four collections, builds this
/// snapshot, and hands it to the engine. Nothing in the engine performs I/O.
#[derive(Debug, Clone, Default)]
pub struct ClinicalSnapshot {
    pub patients: Vec<Patient>,
    pub vitals: Vec<VitalRecord>,
    pub lab_results: Vec<LabResult>,
    pub consultations: Vec<ConsultationRecord>,
}

// ---------------------------------------------------------------------------
// PatientRegistry
// ---------------------------------------------------------------------------

/// Registered patients, one per id, in input order.
pub struct PatientRegistry<'a> {
    patients: Vec<&'a Patient>,
    index: HashMap<&'a str, usize>,
}

impl<'a> PatientRegistry<'a> {
    /// Rows without an id are skipped; duplicate ids keep the first row.
    pub fn build(rows: &'a [Patient]) -> Self {
        let mut patients = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());

        for patient in rows {
            if patient.id.is_empty() {
                tracing::warn!("Skipping registry row without patient id");
                continue;
            }
            if index.contains_key(patient.id.as_str()) {
                tracing::warn!(patient_id = %patient.id, "Duplicate registry row ignored");
                continue;
            }
            index.insert(patient.id.as_str(), patients.len());
            patients.push(patient);
        }

        Self { patients, index }
    }

    pub fn get(&self, id: &str) -> Option<&'a Patient> {
        self.index.get(id).map(|&i| self.patients[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Patient> + '_ {
        self.patients.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Signals and per-patient state
// ---------------------------------------------------------------------------

/// Stream a severity signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Vitals,
    Lab,
    Consultation,
}

/// One severity-bearing observation with its display text, e.g. `"BP: 150/95"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSignal {
    pub source: SignalSource,
    pub severity: RiskLevel,
    pub factor: String,
}

/// Canonical classification of one patient for one computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRiskState {
    pub patient_id: String,
    pub level: RiskLevel,
    pub factors: BTreeSet<String>,
    /// Most recent timestamp across the patient's latest records; `None` with no records.
    pub last_observed_at: Option<NaiveDateTime>,
}

impl PatientRiskState {
    pub fn normal(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            level: RiskLevel::Normal,
            factors: BTreeSet::new(),
            last_observed_at: None,
        }
    }
}

/// Patient id → merged state, covering every registered patient.
pub type RiskMap = BTreeMap<String, PatientRiskState>;

// ---------------------------------------------------------------------------
// Output views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub hypertensive: usize,
    pub critical_ldl: usize,
    pub diabetic_watch: usize,
    pub obesity: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stratification {
    pub normal: usize,
    pub at_risk: usize,
    pub critical: usize,
}

impl Stratification {
    pub fn total(&self) -> usize {
        self.normal + self.at_risk + self.critical
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorCount {
    pub factor: String,
    pub count: usize,
}

/// Share of a department's patients in each risk band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRiskRow {
    pub department: String,
    pub patients: usize,
    pub normal: f64,
    pub at_risk: f64,
    pub critical: f64,
}

/// Share of a department's patients in each chronic category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentChronicRow {
    pub department: String,
    pub patients: usize,
    pub smoking: f64,
    pub drinking: f64,
    pub hypertension: f64,
    pub diabetes: f64,
    pub none: f64,
}

impl DepartmentChronicRow {
    /// Share of patients carrying any tracked chronic factor.
    pub fn flagged_share(&self) -> f64 {
        self.smoking + self.drinking + self.hypertension + self.diabetes
    }
}

/// One at-risk patient in the follow-up listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortEntry {
    pub patient_id: String,
    pub name: String,
    pub department: String,
    pub level: RiskLevel,
    pub factors: String,
    pub last_observed_at: Option<NaiveDateTime>,
}

/// All views derived from one risk map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub kpis: Kpis,
    pub stratification: Stratification,
    pub chronic_factor_prevalence: Vec<FactorCount>,
    pub department_risk_mix: Vec<DepartmentRiskRow>,
    pub department_chronic_mix: Vec<DepartmentChronicRow>,
    pub cohort: Cohort,
}
