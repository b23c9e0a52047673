//! Clinical risk stratification.
//!
//! The engine reduces a [`ClinicalSnapshot`] to one [`PatientRiskState`] per
//! registered patient, then derives every population view from that single
//! map so the views cannot disagree with each other.

pub mod aggregate;
pub mod chronic;
pub mod classify;
pub mod cohort;
pub mod engine;
pub mod helpers;
pub mod latest;
pub mod merge;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cohort::{Cohort, DEFAULT_PAGE_SIZE};
pub use engine::{DefaultRiskEngine, RiskEngine};
pub use types::{
    ClinicalSnapshot, CohortEntry, DepartmentChronicRow, DepartmentRiskRow, FactorCount, Kpis,
    PatientRiskState, RiskMap, RiskReport, Stratification,
};
