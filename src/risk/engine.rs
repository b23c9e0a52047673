use std::collections::BTreeSet;
use std::time::Instant;

use crate::config::EngineConfig;

use super::aggregate::{
    chronic_factor_prevalence, compute_kpis, department_chronic_mix, department_risk_mix,
    group_by_department, stratify,
};
use super::chronic::chronic_profiles;
use super::cohort::build_cohort;
use super::latest::LatestRecords;
use super::merge::{build_risk_map, merge_classifications, patient_classifications};
use super::types::{ClinicalSnapshot, PatientRegistry, PatientRiskState, RiskMap, RiskReport};

/// Risk stratification over one pre-fetched snapshot.
///
/// Every operation is a pure function of its input: no I/O, no errors,
/// identical output for identical snapshots.
pub trait RiskEngine {
    /// Build every view from a single canonical risk map.
    fn compute(&self, snapshot: &ClinicalSnapshot) -> RiskReport;

    /// The canonical risk map alone, one entry per registered patient.
    fn risk_states(&self, snapshot: &ClinicalSnapshot) -> RiskMap;

    /// Merged state for one registered patient; `None` if the id is not registered.
    fn patient_state(&self, snapshot: &ClinicalSnapshot, patient_id: &str)
        -> Option<PatientRiskState>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultRiskEngine {
    config: EngineConfig,
}

impl DefaultRiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn log_orphans(registry: &PatientRegistry<'_>, latest: &LatestRecords<'_>) {
        let orphans: BTreeSet<&str> = latest
            .patient_keys()
            .filter(|key| !registry.contains(key))
            .collect();
        if !orphans.is_empty() {
            tracing::debug!(
                count = orphans.len(),
                ids = ?orphans,
                "Ignoring stream rows for unregistered patients"
            );
        }
    }
}

impl RiskEngine for DefaultRiskEngine {
    fn compute(&self, snapshot: &ClinicalSnapshot) -> RiskReport {
        let start = Instant::now();

        let registry = PatientRegistry::build(&snapshot.patients);
        let latest = LatestRecords::select(snapshot);
        Self::log_orphans(&registry, &latest);

        let risk_map = build_risk_map(&registry, &latest);
        let profiles = chronic_profiles(&registry, &latest.consultations);
        let departments = group_by_department(&registry, &self.config.departments);

        let report = RiskReport {
            kpis: compute_kpis(&registry, &latest),
            stratification: stratify(&risk_map),
            chronic_factor_prevalence: chronic_factor_prevalence(
                &profiles,
                self.config.prevalence_top_n,
            ),
            department_risk_mix: department_risk_mix(&departments, &risk_map),
            department_chronic_mix: department_chronic_mix(&departments, &profiles),
            cohort: build_cohort(&registry, &risk_map, self.config.cohort_page_size),
        };

        tracing::info!(
            patients = registry.len(),
            critical = report.stratification.critical,
            at_risk = report.stratification.at_risk,
            normal = report.stratification.normal,
            cohort = report.cohort.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Risk report computed"
        );

        report
    }

    fn risk_states(&self, snapshot: &ClinicalSnapshot) -> RiskMap {
        let registry = PatientRegistry::build(&snapshot.patients);
        let latest = LatestRecords::select(snapshot);
        build_risk_map(&registry, &latest)
    }

    fn patient_state(
        &self,
        snapshot: &ClinicalSnapshot,
        patient_id: &str,
    ) -> Option<PatientRiskState> {
        let registry = PatientRegistry::build(&snapshot.patients);
        let patient = registry.get(patient_id)?;
        let latest = LatestRecords::select(snapshot);
        Some(merge_classifications(
            &patient.id,
            patient_classifications(&latest, &patient.id),
            latest.last_observed_at(&patient.id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clearance, RiskLevel};
    use crate::risk::fixtures::{at, consult, lab_hba1c, lab_ldl, patient, vital_bmi, vital_bp};

    fn snapshot() -> ClinicalSnapshot {
        ClinicalSnapshot {
            patients: vec![
                patient("P", "Assembly"),
                patient("Q", "Assembly"),
                patient("R", "Engineering"),
                patient("S", "Logistics"),
                patient("T", ""),
            ],
            vitals: vec![
                vital_bp("P", at(1), 150.0, 95.0),
                vital_bmi("S", at(2), 36.2),
                vital_bp("ghost", at(2), 190.0, 120.0),
            ],
            lab_results: vec![lab_ldl("Q", at(3), 170.0), lab_hba1c("T", at(4), 6.8)],
            consultations: vec![
                consult("Q", at(5), Some(Clearance::AtRisk), Some("Smoking, none")),
                consult("S", at(6), Some(Clearance::Normal), Some("Alcohol, Hypertension")),
                consult("T", at(6), None, Some("Asthma")),
            ],
        }
    }

    fn engine() -> DefaultRiskEngine {
        DefaultRiskEngine::default()
    }

    #[test]
    fn report_is_deterministic() {
        let snap = snapshot();
        assert_eq!(engine().compute(&snap), engine().compute(&snap));
    }

    #[test]
    fn every_view_agrees_with_risk_map() {
        let snap = snapshot();
        let report = engine().compute(&snap);
        let map = engine().risk_states(&snap);

        assert_eq!(map.len(), 5);
        assert_eq!(report.stratification.total(), 5);
        let critical = map.values().filter(|s| s.level == RiskLevel::Critical).count();
        let at_risk = map.values().filter(|s| s.level == RiskLevel::AtRisk).count();
        assert_eq!(report.stratification.critical, critical);
        assert_eq!(report.stratification.at_risk, at_risk);
        assert_eq!(report.cohort.len(), critical + at_risk);

        for entry in report.cohort.entries() {
            assert_eq!(map[&entry.patient_id].level, entry.level);
        }

        let dept_patients: usize = report.department_risk_mix.iter().map(|r| r.patients).sum();
        assert_eq!(dept_patients, 5);
        let chronic_patients: usize =
            report.department_chronic_mix.iter().map(|r| r.patients).sum();
        assert_eq!(chronic_patients, 5);
    }

    #[test]
    fn known_scenarios() {
        let snap = snapshot();
        let map = engine().risk_states(&snap);
        assert_eq!(map["P"].level, RiskLevel::AtRisk);
        assert_eq!(map["Q"].level, RiskLevel::Critical);
        assert_eq!(map["R"], PatientRiskState::normal("R"));
        assert_eq!(map["S"].level, RiskLevel::Critical);
        assert_eq!(map["T"].level, RiskLevel::AtRisk);
        assert!(!map.contains_key("ghost"));

        let report = engine().compute(&snap);
        assert_eq!(report.kpis.hypertensive, 1);
        assert_eq!(report.kpis.critical_ldl, 1);
        assert_eq!(report.kpis.diabetic_watch, 1);
        assert_eq!(report.kpis.obesity, 1);

        let ids: Vec<&str> = report
            .cohort
            .entries()
            .iter()
            .map(|e| e.patient_id.as_str())
            .collect();
        assert_eq!(ids, vec!["Q", "S", "P", "T"]);
    }

    #[test]
    fn empty_snapshot_yields_empty_views() {
        let report = engine().compute(&ClinicalSnapshot::default());
        assert_eq!(report.stratification.total(), 0);
        assert!(report.chronic_factor_prevalence.is_empty());
        assert!(report.department_risk_mix.is_empty());
        assert!(report.department_chronic_mix.is_empty());
        assert!(report.cohort.is_empty());
        assert!(report.cohort.page(1).is_empty());
    }

    #[test]
    fn known_departments_report_zero_rows() {
        let config = EngineConfig {
            departments: vec!["Finance".into()],
            ..EngineConfig::default()
        };
        let report = DefaultRiskEngine::new(config).compute(&snapshot());
        let finance = report
            .department_risk_mix
            .iter()
            .find(|r| r.department == "Finance")
            .unwrap();
        assert_eq!(finance.patients, 0);
        assert_eq!(finance.normal + finance.at_risk + finance.critical, 0.0);
    }

    #[test]
    fn prevalence_and_mix_share_tokens() {
        let report = engine().compute(&snapshot());
        let factors: Vec<&str> = report
            .chronic_factor_prevalence
            .iter()
            .map(|f| f.factor.as_str())
            .collect();
        assert_eq!(factors, vec!["Alcohol", "Asthma", "Hypertension", "Smoking"]);

        // S counts under Drinking (precedence over Hypertension); T's Asthma is untracked.
        let logistics = report
            .department_chronic_mix
            .iter()
            .find(|r| r.department == "Logistics")
            .unwrap();
        assert_eq!(logistics.drinking, 1.0);
        assert_eq!(logistics.hypertension, 0.0);
        let unknown = report
            .department_chronic_mix
            .iter()
            .find(|r| r.department == "Unknown")
            .unwrap();
        assert_eq!(unknown.none, 1.0);
    }

    #[test]
    fn recordless_patient_counts_as_normal_in_department_mix() {
        let mut snap = snapshot();
        snap.patients.push(patient("E", "Engineering"));
        snap.vitals.push(vital_bmi("E", at(3), 31.0));

        let report = engine().compute(&snap);
        let engineering = report
            .department_risk_mix
            .iter()
            .find(|r| r.department == "Engineering")
            .unwrap();
        assert_eq!(engineering.patients, 2);
        assert_eq!(engineering.normal, 0.5);
        assert_eq!(engineering.at_risk, 0.5);
        assert_eq!(engineering.critical, 0.0);

        let chronic = report
            .department_chronic_mix
            .iter()
            .find(|r| r.department == "Engineering")
            .unwrap();
        assert_eq!(chronic.patients, 2);
        assert_eq!(chronic.none, 1.0);
    }

    #[test]
    fn single_patient_lookup_matches_map() {
        let snap = snapshot();
        let map = engine().risk_states(&snap);
        for id in ["P", "Q", "R", "S", "T"] {
            assert_eq!(engine().patient_state(&snap, id).as_ref(), map.get(id));
        }
        assert!(engine().patient_state(&snap, "ghost").is_none());
    }

    #[test]
    fn prevalence_respects_top_n() {
        let config = EngineConfig {
            prevalence_top_n: 2,
            ..EngineConfig::default()
        };
        let report = DefaultRiskEngine::new(config).compute(&snapshot());
        assert_eq!(report.chronic_factor_prevalence.len(), 2);
    }
}
