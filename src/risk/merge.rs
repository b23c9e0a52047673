//! Upgrade-only merge of per-stream classifications into one state per patient.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use super::classify::{classify_consultation, classify_lab, classify_vitals, Classification};
use super::latest::LatestRecords;
use super::types::{PatientRegistry, PatientRiskState, RiskMap};

/// Fold classifications into a state: the level only ever rises, and every
/// factor is kept whether or not its classification changed the level.
pub fn merge_classifications<I>(
    patient_id: &str,
    classifications: I,
    last_observed_at: Option<NaiveDateTime>,
) -> PatientRiskState
where
    I: IntoIterator<Item = Classification>,
{
    let initial = PatientRiskState {
        last_observed_at,
        ..PatientRiskState::normal(patient_id)
    };

    classifications.into_iter().fold(initial, |state, classification| {
        let level = if classification.severity > state.level {
            classification.severity
        } else {
            state.level
        };
        let mut factors: BTreeSet<String> = state.factors;
        factors.extend(classification.factors);
        PatientRiskState {
            level,
            factors,
            ..state
        }
    })
}

/// One classification per stream that has a latest row, in stream order.
pub fn patient_classifications(
    latest: &LatestRecords<'_>,
    patient_id: &str,
) -> Vec<Classification> {
    let vitals = latest.vitals.get(patient_id).map(|v| classify_vitals(v));
    let lab = latest.labs.get(patient_id).map(|l| classify_lab(l));
    let consultation = latest
        .consultations
        .get(patient_id)
        .map(|c| classify_consultation(c));

    vitals.into_iter().chain(lab).chain(consultation).collect()
}

/// The canonical risk map: exactly one state per registered patient.
pub fn build_risk_map(registry: &PatientRegistry<'_>, latest: &LatestRecords<'_>) -> RiskMap {
    registry
        .iter()
        .map(|patient| {
            let id = patient.id.as_str();
            let state = merge_classifications(
                id,
                patient_classifications(latest, id),
                latest.last_observed_at(id),
            );
            (patient.id.clone(), state)
        })
        .collect()
}
