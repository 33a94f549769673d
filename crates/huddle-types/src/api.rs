use serde::{Deserialize, Serialize};

use crate::models::Message;

// Request fields are optional so handlers can report a missing field as a
// validation error instead of a generic body rejection. Unknown fields are
// tolerated: browser clients send extras such as `chatId` to update-name.

// -- Groups --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
}

// -- Chats --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub name: Option<String>,
    pub group_id: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateNameRequest {
    pub message: Option<String>,
}

/// Result of the rename step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(String),
    Unchanged(String),
}

impl RenameOutcome {
    /// The chat's name after the rename step, whichever way it went.
    pub fn name(&self) -> &str {
        match self {
            Self::Renamed(name) | Self::Unchanged(name) => name,
        }
    }

    pub fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNameResponse {
    pub success: bool,
    pub chat_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chat_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_chat_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateNameResponse {
    pub fn from_outcome(chat_id: i64, outcome: RenameOutcome) -> Self {
        match outcome {
            RenameOutcome::Renamed(name) => Self {
                success: true,
                chat_id,
                new_chat_name: Some(name),
                current_chat_name: None,
                message: None,
            },
            RenameOutcome::Unchanged(name) => Self {
                success: false,
                chat_id,
                new_chat_name: None,
                current_chat_name: Some(name),
                message: Some("Chat name remains unchanged".into()),
            },
        }
    }
}

// -- Messages --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: Option<i64>,
    pub sender: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub chat_id: i64,
    pub messages: Vec<Message>,
}

/// Everything the client needs to reconcile after a send, without a
/// second round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub chat_id: i64,
    pub chat_name: String,
    /// Present only when this send renamed the chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chat_name: Option<String>,
    pub messages: Vec<Message>,
}

// -- Misc --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_uses_camel_case_and_ignores_extras() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"chatId":4,"sender":"user","message":"hi","extra":true}"#)
                .unwrap();
        assert_eq!(req.chat_id, Some(4));
        assert_eq!(req.sender.as_deref(), Some("user"));
        assert_eq!(req.message.as_deref(), Some("hi"));
    }

    #[test]
    fn unchanged_rename_reports_current_name() {
        let resp = UpdateNameResponse::from_outcome(9, RenameOutcome::Unchanged("Billing".into()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["chatId"], 9);
        assert_eq!(json["currentChatName"], "Billing");
        assert!(json.get("newChatName").is_none());
    }

    #[test]
    fn send_response_omits_name_when_not_renamed() {
        let resp = SendMessageResponse {
            chat_id: 1,
            chat_name: "Billing".into(),
            new_chat_name: None,
            messages: vec![],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["chatName"], "Billing");
        assert!(json.get("newChatName").is_none());
    }
}
