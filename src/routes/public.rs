use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that sit outside the `/api` collections.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(handlers::health))
}
