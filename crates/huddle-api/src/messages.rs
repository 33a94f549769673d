use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use huddle_types::api::{MessagesResponse, SendMessageRequest, SendMessageResponse};

use crate::error::ApiError;
use crate::state::{AppState, required, with_db};

/// GET /api/messages/{chat_id}
pub async fn get_messages(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let Path(chat_id) = path?;

    let messages = with_db(&state, move |db| db.get_messages(chat_id)).await?;

    Ok(Json(MessagesResponse { chat_id, messages }))
}

/// POST /api/messages: renames a default-named chat from the text, then
/// appends. Responds with the chat's name and its whole log.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Json(req) = payload?;
    let chat_id = req
        .chat_id
        .ok_or_else(|| ApiError::Validation("Chat ID is required".into()))?;
    let sender = required(req.sender, "Sender")?;
    let text = required(req.message, "Message")?;

    let outcome = with_db(&state, move |db| db.send_message(chat_id, &sender, &text)).await?;

    let chat_name = outcome.rename.name().to_string();
    let new_chat_name = outcome.rename.is_renamed().then(|| chat_name.clone());

    Ok(Json(SendMessageResponse {
        chat_id,
        chat_name,
        new_chat_name,
        messages: outcome.messages,
    }))
}
