use axum::{Json, extract::State, http::header, response::IntoResponse};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::metrics;
use crate::state::AppState;

pub async fn metrics_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": {
            "size": state.cache.len(),
            "type": "memory",
        },
        "rate_limits": {
            "general": {
                "requests_per_window": state.general_limiter.limit(),
                "tracked_clients": state.general_limiter.tracked_clients(),
            },
            "contact": {
                "requests_per_window": state.contact_limiter.limit(),
                "tracked_clients": state.contact_limiter.tracked_clients(),
            },
        },
        "system": {
            "uptime_seconds": state.started_at.elapsed().as_secs(),
        },
    }))
}

// the gauge is read off the cache at scrape time, so lazy purges are reflected
pub async fn prometheus_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    metrics::CACHE_SIZE.set(state.cache.len() as f64);
    let body = metrics::render().map_err(AppError::Internal)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
