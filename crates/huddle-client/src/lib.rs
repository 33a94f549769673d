//! Client side of Huddle: a normalized view of groups and chats, a pure
//! reducer over it, and a [`Session`] that talks to the REST API.

pub mod api;
pub mod error;
pub mod session;
pub mod state;

pub use api::ChatClient;
pub use error::{ClientError, Result};
pub use session::Session;
pub use state::{Action, ClientState, reduce};
