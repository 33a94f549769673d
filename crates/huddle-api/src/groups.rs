use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use huddle_types::api::{CreateGroupRequest, StatusResponse};
use huddle_types::models::GroupWithChats;

use crate::error::ApiError;
use crate::state::{AppState, required, with_db};

/// GET /api/groups: every group with its chats nested.
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<GroupWithChats>>, ApiError> {
    let groups = with_db(&state, |db| db.list_groups()).await?;
    Ok(Json(groups))
}

/// POST /api/groups: creates the group and its default chat.
pub async fn create_group(
    State(state): State<AppState>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let name = required(req.name, "Group name")?;

    let group = with_db(&state, move |db| db.create_group(&name)).await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// DELETE /api/groups
pub async fn delete_groups(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let deleted = with_db(&state, |db| db.delete_all_groups()).await?;
    info!(deleted, "All groups deleted");

    Ok(Json(StatusResponse {
        message: "All groups deleted successfully".into(),
    }))
}

/// DELETE /api/reset: chats first, then groups.
pub async fn reset(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let (chats, groups) = with_db(&state, |db| db.reset()).await?;
    info!(chats, groups, "Reset all chats and groups");

    Ok(Json(StatusResponse {
        message: "All chats and groups deleted".into(),
    }))
}
