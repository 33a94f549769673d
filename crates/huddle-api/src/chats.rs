use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use huddle_types::api::{CreateChatRequest, StatusResponse, UpdateNameRequest, UpdateNameResponse};
use huddle_types::models::Chat;

use crate::error::ApiError;
use crate::state::{AppState, required, with_db};

/// GET /api/chats: flat list of every chat.
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<Chat>>, ApiError> {
    let chats = with_db(&state, |db| db.list_chats()).await?;
    Ok(Json(chats))
}

/// POST /api/chats: a blank or missing name gets the next `"New Chat N"`.
pub async fn create_chat(
    State(state): State<AppState>,
    payload: Result<Json<CreateChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let group_id = req
        .group_id
        .ok_or_else(|| ApiError::Validation("Group ID is required".into()))?;
    let name = req.name.filter(|n| !n.trim().is_empty());

    let chat = with_db(&state, move |db| db.create_chat(group_id, name.as_deref())).await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// DELETE /api/chats
pub async fn delete_chats(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let deleted = with_db(&state, |db| db.delete_all_chats()).await?;
    info!(deleted, "All chats deleted");

    Ok(Json(StatusResponse {
        message: "All chats deleted successfully".into(),
    }))
}

/// PUT /api/chats/{chat_id}/update-name: the rename step on its own.
pub async fn update_name(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateNameRequest>, JsonRejection>,
) -> Result<Json<UpdateNameResponse>, ApiError> {
    let Path(chat_id) = path?;
    let Json(req) = payload?;
    let message = required(req.message, "Message")?;

    let outcome = with_db(&state, move |db| db.rename_from_message(chat_id, &message)).await?;

    Ok(Json(UpdateNameResponse::from_outcome(chat_id, outcome)))
}
