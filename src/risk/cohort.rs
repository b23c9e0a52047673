//! Follow-up cohort: every elevated patient, Critical first, paged.

use serde::Serialize;

use crate::models::RiskLevel;

use super::types::{CohortEntry, PatientRegistry, RiskMap};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Ordered listing of Critical and AtRisk patients.
///
/// Paging is a pure slice over the full ordered list; it never recomputes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    entries: Vec<CohortEntry>,
    page_size: usize,
    total_pages: usize,
}

impl Cohort {
    pub fn new(entries: Vec<CohortEntry>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = entries.len().div_ceil(page_size);
        Self {
            entries,
            page_size,
            total_pages,
        }
    }

    /// Entries on 1-indexed `page`. Page 0 or past the end is empty.
    pub fn page(&self, page: usize) -> &[CohortEntry] {
        if page == 0 || page > self.total_pages {
            return &[];
        }
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn entries(&self) -> &[CohortEntry] {
        &self.entries
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Elevated patients in registry order, then stably sorted so Critical comes first.
pub fn build_cohort(
    registry: &PatientRegistry<'_>,
    risk_map: &RiskMap,
    page_size: usize,
) -> Cohort {
    let mut entries: Vec<CohortEntry> = registry
        .iter()
        .filter_map(|patient| {
            let state = risk_map.get(&patient.id)?;
            state.level.is_elevated().then(|| CohortEntry {
                patient_id: patient.id.clone(),
                name: patient.display_name().to_string(),
                department: patient.department.clone(),
                level: state.level,
                factors: state
                    .factors
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                last_observed_at: state.last_observed_at,
            })
        })
        .collect();

    entries.sort_by_key(|entry| std::cmp::Reverse(entry.level == RiskLevel::Critical));
    Cohort::new(entries, page_size)
}
