//! Chronic-factor normalization.
//!
//! Both chronic views (prevalence and the per-department mix) read patient
//! factors through [`chronic_profiles`], so their token and category sets
//! always agree.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{ChronicCategory, ConsultationRecord};

use super::helpers::title_case;
use super::types::PatientRegistry;

/// Tokens that mean "no data" rather than a factor. Compared after trim + lower-case.
pub const SENTINEL_TOKENS: [&str; 5] = ["none", "null", "n/a", "", "undefined"];

/// Keyword stems per tracked category, checked against the lower-cased factor.
const CATEGORY_KEYWORDS: &[(ChronicCategory, &[&str])] = &[
    (ChronicCategory::Smoking, &["smok", "tobacco"]),
    (ChronicCategory::Drinking, &["drink", "alcohol"]),
    (ChronicCategory::Hypertension, &["hypertens", "high blood pressure"]),
    (ChronicCategory::Diabetes, &["diabet"]),
];

pub fn is_sentinel(token: &str) -> bool {
    SENTINEL_TOKENS.contains(&token)
}

/// Split a free-text chronic-factor field into display tokens.
///
/// `"Smoking, None, diabetes"` → `{"Diabetes", "Smoking"}`.
pub fn normalize_chronic_factors(raw: Option<&str>) -> BTreeSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !is_sentinel(token))
        .map(|token| title_case(&token))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tracked category a single factor belongs to, if any.
pub fn categorize_factor(factor: &str) -> Option<ChronicCategory> {
    let lower = factor.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, stems)| stems.iter().any(|stem| lower.contains(stem)))
        .map(|(category, _)| *category)
}

/// The single category a patient counts under in the department mix.
/// The highest-precedence tracked category among the factors wins;
/// no tracked factor means `None`.
pub fn primary_category(factors: &BTreeSet<String>) -> ChronicCategory {
    factors
        .iter()
        .filter_map(|factor| categorize_factor(factor))
        .min_by_key(|category| precedence(*category))
        .unwrap_or(ChronicCategory::None)
}

fn precedence(category: ChronicCategory) -> usize {
    ChronicCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(ChronicCategory::ALL.len())
}

/// Normalized factors of every registered patient, read from their latest
/// consultation. Patients without a consultation get an empty set.
pub fn chronic_profiles<'a>(
    registry: &PatientRegistry<'a>,
    latest_consultations: &HashMap<&str, &ConsultationRecord>,
) -> BTreeMap<&'a str, BTreeSet<String>> {
    registry
        .iter()
        .map(|patient| {
            let factors = latest_consultations
                .get(patient.id.as_str())
                .map(|c| normalize_chronic_factors(c.chronic_risk_factor.as_deref()))
                .unwrap_or_default();
            (patient.id.as_str(), factors)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;
    use crate::risk::fixtures::{at, consult, patient};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_none_and_normalizes_case() {
        assert_eq!(
            normalize_chronic_factors(Some("Smoking, None, diabetes")),
            set(&["Smoking", "Diabetes"])
        );
    }

    #[test]
    fn drops_every_sentinel() {
        assert!(normalize_chronic_factors(Some("none, NULL, N/A, , undefined")).is_empty());
        assert!(normalize_chronic_factors(Some("")).is_empty());
        assert!(normalize_chronic_factors(None).is_empty());
    }

    #[test]
    fn deduplicates_across_case_and_spacing() {
        assert_eq!(
            normalize_chronic_factors(Some("smoking,SMOKING ,  Smoking")),
            set(&["Smoking"])
        );
        assert_eq!(
            normalize_chronic_factors(Some("high  blood pressure")),
            set(&["High Blood Pressure"])
        );
    }

    #[test]
    fn single_token_field() {
        assert_eq!(normalize_chronic_factors(Some("Hypertension")), set(&["Hypertension"]));
    }

    #[test]
    fn category_keywords() {
        assert_eq!(categorize_factor("Smoking"), Some(ChronicCategory::Smoking));
        assert_eq!(categorize_factor("Alcohol Use"), Some(ChronicCategory::Drinking));
        assert_eq!(categorize_factor("High Blood Pressure"), Some(ChronicCategory::Hypertension));
        assert_eq!(categorize_factor("Type 2 Diabetes"), Some(ChronicCategory::Diabetes));
        assert_eq!(categorize_factor("Asthma"), None);
    }

    #[test]
    fn primary_category_follows_precedence() {
        assert_eq!(
            primary_category(&set(&["Diabetes", "Smoking"])),
            ChronicCategory::Smoking
        );
        assert_eq!(
            primary_category(&set(&["Diabetes", "Hypertension"])),
            ChronicCategory::Hypertension
        );
        assert_eq!(primary_category(&set(&["Asthma"])), ChronicCategory::None);
        assert_eq!(primary_category(&BTreeSet::new()), ChronicCategory::None);
    }

    #[test]
    fn profiles_cover_every_registered_patient() {
        let rows: Vec<Patient> = vec![patient("p1", "Ops"), patient("p2", "Ops")];
        let registry = PatientRegistry::build(&rows);
        let consultations = vec![consult("p1", at(1), None, Some("smoking, none"))];
        let latest: HashMap<&str, &ConsultationRecord> = consultations
            .iter()
            .map(|c| (c.patient_id.as_str(), c))
            .collect();

        let profiles = chronic_profiles(&registry, &latest);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles["p1"], set(&["Smoking"]));
        assert!(profiles["p2"].is_empty());
    }
}
