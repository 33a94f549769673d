pub mod chats;
pub mod error;
pub mod groups;
pub mod messages;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
