use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::state::AppState;
use crate::{chats, groups, messages};

/// All REST routes under `/api`. Transport layers (CORS, tracing) are added
/// by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/groups",
            get(groups::list_groups)
                .post(groups::create_group)
                .delete(groups::delete_groups),
        )
        .route(
            "/api/chats",
            get(chats::list_chats)
                .post(chats::create_chat)
                .delete(chats::delete_chats),
        )
        .route("/api/chats/{chat_id}/update-name", put(chats::update_name))
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages/{chat_id}", get(messages::get_messages))
        .route("/api/reset", delete(groups::reset))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
