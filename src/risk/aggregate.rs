//! Population views over the canonical risk map.
//!
//! Every reducer here reads severity from the [`RiskMap`] and chronic factors
//! from the shared profiles; none of them re-classifies a record.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::patient::normalize_department;
use crate::models::{ChronicCategory, LabResult, Patient, RiskLevel, VitalRecord};

use super::chronic::primary_category;
use super::classify::{has_critical_ldl, is_diabetic_watch, is_hypertensive, is_obese};
use super::helpers::fraction;
use super::latest::LatestRecords;
use super::types::{
    DepartmentChronicRow, DepartmentRiskRow, FactorCount, Kpis, PatientRegistry, RiskMap,
    Stratification,
};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Scalar counters over registered patients' latest rows.
pub fn compute_kpis(registry: &PatientRegistry<'_>, latest: &LatestRecords<'_>) -> Kpis {
    let count_vitals = |predicate: fn(&VitalRecord) -> bool| {
        latest
            .vitals
            .iter()
            .filter(|&(&id, &vital)| registry.contains(id) && predicate(vital))
            .count()
    };
    let count_labs = |predicate: fn(&LabResult) -> bool| {
        latest
            .labs
            .iter()
            .filter(|&(&id, &lab)| registry.contains(id) && predicate(lab))
            .count()
    };

    Kpis {
        hypertensive: count_vitals(is_hypertensive),
        critical_ldl: count_labs(has_critical_ldl),
        diabetic_watch: count_labs(is_diabetic_watch),
        obesity: count_vitals(is_obese),
    }
}

// ---------------------------------------------------------------------------
// Stratification
// ---------------------------------------------------------------------------

pub fn stratify(risk_map: &RiskMap) -> Stratification {
    risk_map
        .values()
        .fold(Stratification::default(), |mut acc, state| {
            match state.level {
                RiskLevel::Normal => acc.normal += 1,
                RiskLevel::AtRisk => acc.at_risk += 1,
                RiskLevel::Critical => acc.critical += 1,
            }
            acc
        })
}

// ---------------------------------------------------------------------------
// Chronic-factor prevalence
// ---------------------------------------------------------------------------

/// Patients per normalized factor, most common first (ties alphabetical),
/// truncated to `top_n`.
pub fn chronic_factor_prevalence(
    profiles: &BTreeMap<&str, BTreeSet<String>>,
    top_n: usize,
) -> Vec<FactorCount> {
    let counts: BTreeMap<&str, usize> =
        profiles
            .values()
            .flatten()
            .fold(BTreeMap::new(), |mut acc, factor| {
                *acc.entry(factor.as_str()).or_insert(0) += 1;
                acc
            });

    let mut ranked: Vec<FactorCount> = counts
        .into_iter()
        .map(|(factor, count)| FactorCount {
            factor: factor.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration already ordered names; the stable sort keeps that for ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

// ---------------------------------------------------------------------------
// Department views
// ---------------------------------------------------------------------------

/// Registered patients grouped by department, seeded with `known_departments`
/// so those are reported even with no patients.
pub fn group_by_department<'a>(
    registry: &PatientRegistry<'a>,
    known_departments: &[String],
) -> BTreeMap<String, Vec<&'a Patient>> {
    let seeded: BTreeMap<String, Vec<&'a Patient>> = known_departments
        .iter()
        .map(|d| (normalize_department(Some(d)), Vec::new()))
        .collect();

    registry.iter().fold(seeded, |mut groups, patient| {
        groups
            .entry(patient.department.clone())
            .or_default()
            .push(patient);
        groups
    })
}

/// Risk-band shares per department, most critical first, then most at-risk.
pub fn department_risk_mix(
    departments: &BTreeMap<String, Vec<&Patient>>,
    risk_map: &RiskMap,
) -> Vec<DepartmentRiskRow> {
    let mut rows: Vec<DepartmentRiskRow> = departments
        .iter()
        .map(|(department, patients)| {
            let counts = patients.iter().fold([0usize; 3], |mut acc, patient| {
                let level = risk_map
                    .get(&patient.id)
                    .map(|state| state.level)
                    .unwrap_or_default();
                acc[level as usize] += 1;
                acc
            });
            let total = patients.len();
            DepartmentRiskRow {
                department: department.clone(),
                patients: total,
                normal: fraction(counts[RiskLevel::Normal as usize], total),
                at_risk: fraction(counts[RiskLevel::AtRisk as usize], total),
                critical: fraction(counts[RiskLevel::Critical as usize], total),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.critical
            .total_cmp(&a.critical)
            .then(b.at_risk.total_cmp(&a.at_risk))
    });
    rows
}

/// Chronic-category shares per department, highest flagged share first.
/// A patient without a consultation counts as `none`.
pub fn department_chronic_mix(
    departments: &BTreeMap<String, Vec<&Patient>>,
    profiles: &BTreeMap<&str, BTreeSet<String>>,
) -> Vec<DepartmentChronicRow> {
    let mut rows: Vec<(DepartmentChronicRow, f64)> = departments
        .iter()
        .map(|(department, patients)| {
            let counts: HashMap<ChronicCategory, usize> =
                patients.iter().fold(HashMap::new(), |mut acc, patient| {
                    let category = profiles
                        .get(patient.id.as_str())
                        .map(primary_category)
                        .unwrap_or(ChronicCategory::None);
                    *acc.entry(category).or_insert(0) += 1;
                    acc
                });
            let total = patients.len();
            let count = |category: ChronicCategory| counts.get(&category).copied().unwrap_or(0);
            let share = |category: ChronicCategory| fraction(count(category), total);
            // Sort key from counts, so equal shares compare equal regardless of category split.
            let flagged = fraction(total - count(ChronicCategory::None), total);
            let row = DepartmentChronicRow {
                department: department.clone(),
                patients: total,
                smoking: share(ChronicCategory::Smoking),
                drinking: share(ChronicCategory::Drinking),
                hypertension: share(ChronicCategory::Hypertension),
                diabetes: share(ChronicCategory::Diabetes),
                none: share(ChronicCategory::None),
            };
            (row, flagged)
        })
        .collect();

    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows.into_iter().map(|(row, _)| row).collect()
}
