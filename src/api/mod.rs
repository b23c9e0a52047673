//! HTTP surface for the risk engine.
//!
//! Read-only routes nested under `/api/`. Every request resolves a fresh
//! snapshot from the configured source and recomputes the report.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::risk_api_router;
pub use server::{start_risk_api_server_on, RiskApiServer, RiskApiSession};
pub use types::ApiContext;
