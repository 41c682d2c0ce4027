use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{ContactMessage, ContactMessageCreate};
use crate::state::AppState;

// newest messages returned by the admin listing
const MESSAGE_PAGE: usize = 100;

pub async fn create_contact_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactMessageCreate>,
) -> AppResult<Json<Value>> {
    payload.validate()?;

    let message = ContactMessage::from(payload);
    let id = message.id.clone();
    state.store.insert_message(message).await?;

    info!("New contact message created: {}", id);
    Ok(Json(json!({
        "message": "Message sent successfully",
        "id": id,
    })))
}

pub async fn list_contact_messages(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ContactMessage>>> {
    Ok(Json(state.store.messages(MESSAGE_PAGE).await?))
}

pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> AppResult<Json<Value>> {
    if !state.store.mark_read(&message_id).await? {
        return Err(AppError::NotFound("Message not found".into()));
    }
    Ok(Json(json!({ "message": "Message marked as read" })))
}
