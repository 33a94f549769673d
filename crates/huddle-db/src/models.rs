//! Database row types: these map directly to SQLite rows.
//! `messages` stays raw JSON here; decoding happens on conversion so a
//! corrupt log is reported against its chat id.

use huddle_types::models::{Chat, Message};

use crate::{DbError, Result};

pub struct GroupRow {
    pub id: i64,
    pub name: String,
}

pub struct ChatRow {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub messages: Option<String>,
}

impl ChatRow {
    pub fn into_chat(self) -> Result<Chat> {
        let messages = decode_messages(self.id, self.messages.as_deref())?;
        Ok(Chat {
            id: self.id,
            group_id: self.group_id,
            name: self.name,
            messages,
        })
    }
}

/// Parse a stored message log. NULL and empty columns read as an empty log.
pub fn decode_messages(chat_id: i64, raw: Option<&str>) -> Result<Vec<Message>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json)
            .map_err(|source| DbError::CorruptMessages { chat_id, source }),
    }
}

pub fn encode_messages(messages: &[Message]) -> Result<String> {
    serde_json::to_string(messages).map_err(DbError::Encode)
}
