//! Risk API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the risk API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn risk_api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/risk/report", get(endpoints::risk::report))
        .route("/risk/cohort", get(endpoints::risk::cohort))
        .route("/risk/patients/:id", get(endpoints::risk::patient))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
