use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

const SERVICE: &str = "portfolio-api";
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE,
        "version": VERSION,
    }))
}

// Always reports healthy; a store failure is only reflected in database.status
pub async fn detailed_health_handler(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.store.portfolio().await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!("Store check failed: {}", e);
            format!("error: {}", e)
        }
    };

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE,
        "version": VERSION,
        "database": {
            "status": db_status,
            "type": state.store.kind(),
        },
        "cache": {
            "size": state.cache.len(),
        },
        "environment": state.environment,
    }))
}
