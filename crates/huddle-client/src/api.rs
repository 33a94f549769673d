use reqwest::Response;
use serde::de::DeserializeOwned;

use huddle_types::api::{
    CreateChatRequest, CreateGroupRequest, ErrorBody, MessagesResponse, SendMessageRequest,
    SendMessageResponse, StatusResponse, UpdateNameRequest, UpdateNameResponse,
};
use huddle_types::models::{Chat, GroupWithChats};

use crate::error::{ClientError, Result};

/// Thin typed wrapper over the REST API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // -- Groups --

    pub async fn list_groups(&self) -> Result<Vec<GroupWithChats>> {
        decode(self.http.get(self.url("/groups")).send().await?).await
    }

    pub async fn create_group(&self, name: &str) -> Result<GroupWithChats> {
        let body = CreateGroupRequest {
            name: Some(name.to_string()),
        };
        decode(self.http.post(self.url("/groups")).json(&body).send().await?).await
    }

    // -- Chats --

    pub async fn list_chats(&self) -> Result<Vec<Chat>> {
        decode(self.http.get(self.url("/chats")).send().await?).await
    }

    /// Without a name the server picks the next `"New Chat N"`.
    pub async fn create_chat(&self, group_id: i64, name: Option<&str>) -> Result<Chat> {
        let body = CreateChatRequest {
            name: name.map(str::to_string),
            group_id: Some(group_id),
        };
        decode(self.http.post(self.url("/chats")).json(&body).send().await?).await
    }

    pub async fn update_name(&self, chat_id: i64, message: &str) -> Result<UpdateNameResponse> {
        let body = UpdateNameRequest {
            message: Some(message.to_string()),
        };
        let url = self.url(&format!("/chats/{}/update-name", chat_id));
        decode(self.http.put(url).json(&body).send().await?).await
    }

    // -- Messages --

    pub async fn get_messages(&self, chat_id: i64) -> Result<MessagesResponse> {
        let url = self.url(&format!("/messages/{}", chat_id));
        decode(self.http.get(url).send().await?).await
    }

    pub async fn send_message(&self, chat_id: i64, sender: &str, message: &str) -> Result<SendMessageResponse> {
        let body = SendMessageRequest {
            chat_id: Some(chat_id),
            sender: Some(sender.to_string()),
            message: Some(message.to_string()),
        };
        decode(self.http.post(self.url("/messages")).json(&body).send().await?).await
    }

    // -- Reset --

    pub async fn reset(&self) -> Result<StatusResponse> {
        decode(self.http.delete(self.url("/reset")).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    // Fall back to the status text when the body is not one of ours
    let text = resp.text().await.unwrap_or_default();
    let (kind, details) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.details),
        Err(_) => (
            status.canonical_reason().unwrap_or("HTTP error").to_string(),
            text,
        ),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        kind,
        details,
    })
}
