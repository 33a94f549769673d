use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender recorded on the seed message of every new chat.
pub const SYSTEM_SENDER: &str = "System";

/// Seed message of the default chat created alongside a group.
pub const GROUP_WELCOME_TEXT: &str = "Hi, how can I help you?";

/// Seed message of a chat created explicitly inside a group.
pub const CHAT_WELCOME_TEXT: &str = "Welcome to the chat!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// One entry of a chat's message log. Immutable once appended.
///
/// Logs written by older deployments carry no timestamp on seed messages,
/// so it stays optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// A message stamped with the current server time.
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::new(SYSTEM_SENDER, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// A group together with its chats, ordered by chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupWithChats {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub chats: Vec<Chat>,
}

impl GroupWithChats {
    pub fn group(&self) -> Group {
        Group {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_message_without_timestamp_parses() {
        let raw = r#"[{"sender":"System","message":"Hi, how can I help you?"}]"#;
        let messages: Vec<Message> = serde_json::from_str(raw).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, SYSTEM_SENDER);
        assert!(messages[0].timestamp.is_none());

        let out = serde_json::to_string(&messages).unwrap();
        assert!(!out.contains("timestamp"));
    }

    #[test]
    fn new_message_is_timestamped() {
        let msg = Message::new("user", "hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "user");
        assert_eq!(json["message"], "hello");
        assert!(json["timestamp"].is_string());
    }
}
