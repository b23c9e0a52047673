//! Shared state for the risk API router.

use std::sync::Arc;

use crate::risk::{ClinicalSnapshot, DefaultRiskEngine};
use crate::source::{fetch_snapshot, SnapshotSource, SourceError};

/// Shared context for all API routes.
/// Holds no computed results: every request fetches and recomputes.
#[derive(Clone)]
pub struct ApiContext {
    pub source: Arc<dyn SnapshotSource>,
    pub engine: Arc<DefaultRiskEngine>,
}

impl ApiContext {
    pub fn new(source: Arc<dyn SnapshotSource>, engine: DefaultRiskEngine) -> Self {
        Self {
            source,
            engine: Arc::new(engine),
        }
    }

    /// Resolve a fresh snapshot from the configured source.
    pub async fn snapshot(&self) -> Result<ClinicalSnapshot, SourceError> {
        fetch_snapshot(self.source.as_ref()).await
    }
}
