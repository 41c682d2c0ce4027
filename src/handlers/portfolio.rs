use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::Portfolio;
use crate::state::AppState;

pub async fn get_portfolio(State(state): State<AppState>) -> AppResult<Json<Portfolio>> {
    let portfolio = state
        .store
        .portfolio()
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".into()))?;
    info!("Portfolio data retrieved");
    Ok(Json(portfolio))
}

// Replaces the whole document and drops cached reads of the old one
pub async fn update_portfolio(
    State(state): State<AppState>,
    Json(payload): Json<Portfolio>,
) -> AppResult<Json<Value>> {
    payload.validate()?;
    state.store.replace_portfolio(payload).await?;

    state.cache.clear();

    info!("Portfolio data updated");
    Ok(Json(json!({ "message": "Portfolio updated successfully" })))
}
