pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod seed;
pub mod state;
pub mod store;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

use crate::middleware::{cache_response, rate_limit, security_headers};

// creating the router with routes
pub fn build_router(state: AppState) -> Router {
    // cache is the outer layer, so a hit never touches the general limiter
    let portfolio = get(handlers::get_portfolio)
        .route_layer(from_fn_with_state(state.general_limiter.clone(), rate_limit))
        .route_layer(from_fn_with_state(state.cache.clone(), cache_response))
        .put(handlers::update_portfolio);

    let contact = post(handlers::create_contact_message)
        .route_layer(from_fn_with_state(state.contact_limiter.clone(), rate_limit));

    Router::new()
        .route("/api/portfolio", portfolio)
        .route("/api/contact", contact)
        .route("/api/contact/messages", get(handlers::list_contact_messages))
        .route(
            "/api/contact/messages/{message_id}/read",
            put(handlers::mark_message_read),
        )
        .route("/api/health", get(handlers::health_handler))
        .route("/api/health/detailed", get(handlers::detailed_health_handler))
        .route("/api/metrics", get(handlers::metrics_handler))
        .route("/metrics", get(handlers::prometheus_handler))
        .layer(from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
