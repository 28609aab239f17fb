//! # fieldcheck-api: Axum HTTP Service for fieldcheck
//!
//! Puts the validation engine behind HTTP. Records posted for a catalog
//! table are extracted from the request body with the table's paths,
//! checked against the table's schema, and echoed back on success.
//!
//! ## API Surface
//!
//! | Route                      | Module                | Purpose                       |
//! |----------------------------|-----------------------|-------------------------------|
//! | `POST /v1/records`         | [`routes::records`]   | Validate an insert            |
//! | `PATCH /v1/records/{id}`   | [`routes::records`]   | Validate an update            |
//! | `GET /v1/records`          | [`routes::records`]   | Blank column set of a table   |
//! | `POST /v1/validate`        | [`routes::validate`]  | Ad-hoc schema + record check  |
//! | `GET /v1/rules`            | [`routes::validate`]  | Registered rule names         |
//! | `GET /health/*`            | here                  | Liveness and readiness probes |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```

pub mod catalog;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit;

    let api = Router::new()
        .merge(routes::records::router())
        .merge(routes::validate::router())
        .layer(DefaultBodyLimit::max(body_limit));

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: ready once at least one table is being served.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalog.is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "no tables configured").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
