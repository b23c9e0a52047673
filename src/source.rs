//! Data-access boundary.
//!
//! A [`SnapshotSource`] resolves the four upstream collections; [`fetch_snapshot`]
//! runs them concurrently and hands the engine a complete [`ClinicalSnapshot`]
//! or an error, never a partial one.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{ConsultationRecord, LabResult, Patient, VitalRecord};
use crate::risk::ClinicalSnapshot;

pub const PATIENTS_FILE: &str = "patients.json";
pub const VITALS_FILE: &str = "vitals.json";
pub const LAB_RESULTS_FILE: &str = "lab_results.json";
pub const CONSULTATIONS_FILE: &str = "consultations.json";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed collection {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Upstream collections, each fetched independently.
pub trait SnapshotSource: Send + Sync {
    fn patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, SourceError>>;
    fn vitals(&self) -> BoxFuture<'_, Result<Vec<VitalRecord>, SourceError>>;
    fn lab_results(&self) -> BoxFuture<'_, Result<Vec<LabResult>, SourceError>>;
    fn consultations(&self) -> BoxFuture<'_, Result<Vec<ConsultationRecord>, SourceError>>;
}

/// Resolve all four collections concurrently. Fails as a whole if any fetch fails.
pub async fn fetch_snapshot(source: &dyn SnapshotSource) -> Result<ClinicalSnapshot, SourceError> {
    let (patients, vitals, lab_results, consultations) = tokio::try_join!(
        source.patients(),
        source.vitals(),
        source.lab_results(),
        source.consultations(),
    )?;

    tracing::debug!(
        patients = patients.len(),
        vitals = vitals.len(),
        lab_results = lab_results.len(),
        consultations = consultations.len(),
        "Snapshot fetched"
    );

    Ok(ClinicalSnapshot {
        patients,
        vitals,
        lab_results,
        consultations,
    })
}

// ---------------------------------------------------------------------------
// JSON directory
// ---------------------------------------------------------------------------

/// Reads each collection from a JSON array file inside one directory.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load<T>(&self, file: &'static str) -> BoxFuture<'_, Result<Vec<T>, SourceError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let path = self.root.join(file);
        Box::pin(async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| SourceError::Read {
                    path: path.clone(),
                    source,
                })?;
            serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse { path, source })
        })
    }
}

impl SnapshotSource for JsonDirectorySource {
    fn patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, SourceError>> {
        self.load(PATIENTS_FILE)
    }

    fn vitals(&self) -> BoxFuture<'_, Result<Vec<VitalRecord>, SourceError>> {
        self.load(VITALS_FILE)
    }

    fn lab_results(&self) -> BoxFuture<'_, Result<Vec<LabResult>, SourceError>> {
        self.load(LAB_RESULTS_FILE)
    }

    fn consultations(&self) -> BoxFuture<'_, Result<Vec<ConsultationRecord>, SourceError>> {
        self.load(CONSULTATIONS_FILE)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Serves a fixed snapshot. Used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    snapshot: ClinicalSnapshot,
}

impl InMemorySource {
    pub fn new(snapshot: ClinicalSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for InMemorySource {
    fn patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, SourceError>> {
        Box::pin(async move { Ok(self.snapshot.patients.clone()) })
    }

    fn vitals(&self) -> BoxFuture<'_, Result<Vec<VitalRecord>, SourceError>> {
        Box::pin(async move { Ok(self.snapshot.vitals.clone()) })
    }

    fn lab_results(&self) -> BoxFuture<'_, Result<Vec<LabResult>, SourceError>> {
        Box::pin(async move { Ok(self.snapshot.lab_results.clone()) })
    }

    fn consultations(&self) -> BoxFuture<'_, Result<Vec<ConsultationRecord>, SourceError>> {
        Box::pin(async move { Ok(self.snapshot.consultations.clone()) })
    }
}
