use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{kind} ({status}): {details}")]
    Api {
        status: u16,
        kind: String,
        details: String,
    },

    #[error("group {0} is not loaded")]
    UnknownGroup(i64),
}

pub type Result<T> = std::result::Result<T, ClientError>;
