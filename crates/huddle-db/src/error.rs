use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("chat {0} not found")]
    ChatNotFound(i64),

    #[error("group {0} not found")]
    GroupNotFound(i64),

    #[error("stored messages of chat {chat_id} are not a message list: {source}")]
    CorruptMessages {
        chat_id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode messages: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("DB lock poisoned: {0}")]
    Poisoned(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
