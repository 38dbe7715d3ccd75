//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/flows", get(handlers::list_flows))
        .route("/scenarios", get(handlers::list_scenarios))
        // Sessions
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/events", post(handlers::apply_event))
        // Micro-checks
        .route("/sessions/:id/micro-checks", get(handlers::list_micro_checks))
        .route("/sessions/:id/micro-checks", post(handlers::answer_micro_check))
        // Advisor packet
        .route("/sessions/:id/packet", post(handlers::generate_packet));

    // Build router with middleware
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
