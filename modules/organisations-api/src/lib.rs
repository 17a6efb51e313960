use std::sync::Arc;

use axum::{routing::get, Router};

use organisations_graph::GraphStore;

pub mod health;
pub mod organisations;
pub mod state;

pub use state::AppState;

/// All routes of the service. Only GET is routed; other methods answer 405.
pub fn router<S: GraphStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/organisations/{uuid}", get(organisations::get_organisation::<S>))
        // Health and operational endpoints
        .route("/__health", get(health::health::<S>))
        .route("/__gtg", get(health::good_to_go::<S>))
        .route("/__ping", get(health::ping))
        .route("/ping", get(health::ping))
        .route("/__build-info", get(health::build_info))
        .route("/build-info", get(health::build_info))
        .with_state(state)
        // Logging layer: method + path + status + latency
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        )
}
