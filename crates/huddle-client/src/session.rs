use tracing::{debug, warn};

use huddle_types::api::UpdateNameResponse;
use huddle_types::models::Message;

use crate::api::ChatClient;
use crate::error::{ClientError, Result};
use crate::state::{Action, ClientState, reduce};

const DEFAULT_SENDER: &str = "user";

/// Drives the chat workflows: issues requests and feeds the results
/// through [`reduce`].
///
/// Failures are logged, recorded as the state's `last_error` for display,
/// and returned to the caller.
pub struct Session {
    client: ChatClient,
    state: ClientState,
    sender: String,
}

impl Session {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            state: ClientState::default(),
            sender: DEFAULT_SENDER.to_string(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn fail<T>(&mut self, context: &str, err: ClientError) -> Result<T> {
        warn!("{}: {}", context, err);
        self.apply(Action::RequestFailed(format!("{}: {}", context, err)));
        Err(err)
    }

    /// Reload every group and chat from the server.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.client.list_groups().await {
            Ok(groups) => {
                self.apply(Action::GroupsLoaded(groups));
                Ok(())
            }
            Err(e) => self.fail("Error loading groups", e),
        }
    }

    /// Reload the flat chat list, keeping the loaded groups.
    pub async fn refresh_chats(&mut self) -> Result<()> {
        match self.client.list_chats().await {
            Ok(chats) => {
                self.apply(Action::ChatsLoaded(chats));
                Ok(())
            }
            Err(e) => self.fail("Error fetching chats", e),
        }
    }

    /// Create `"Group N"` and open its default chat. Returns the group id.
    pub async fn new_group(&mut self) -> Result<i64> {
        let name = self.state.next_group_name();
        match self.client.create_group(&name).await {
            Ok(group) => {
                let id = group.id;
                self.apply(Action::GroupCreated(group));
                Ok(id)
            }
            Err(e) => self.fail("Error creating group", e),
        }
    }

    /// Create a default-named chat in a loaded group and open it.
    pub async fn new_chat_in_group(&mut self, group_id: i64) -> Result<i64> {
        if self.state.group(group_id).is_none() {
            return self.fail("Error creating chat", ClientError::UnknownGroup(group_id));
        }

        match self.client.create_chat(group_id, None).await {
            Ok(chat) => {
                let id = chat.id;
                self.apply(Action::ChatCreated(chat));
                Ok(id)
            }
            Err(e) => self.fail("Error creating chat", e),
        }
    }

    /// Open a chat and load its thread. On failure the thread is emptied
    /// and the error recorded.
    pub async fn select_chat(&mut self, chat_id: i64) -> Result<()> {
        self.apply(Action::ChatSelected(chat_id));

        match self.client.get_messages(chat_id).await {
            Ok(resp) => {
                self.apply(Action::MessagesLoaded {
                    chat_id,
                    messages: resp.messages,
                });
                Ok(())
            }
            Err(e) => {
                warn!("Error fetching messages: {}", e);
                self.apply(Action::MessagesFailed {
                    chat_id,
                    error: format!("Error fetching messages: {}", e),
                });
                Err(e)
            }
        }
    }

    /// Send `input` to the active chat. Blank input, or no active chat, is
    /// a no-op.
    pub async fn send(&mut self, input: &str) -> Result<()> {
        let Some(chat_id) = self.state.active_chat_id() else {
            return Ok(());
        };
        if input.trim().is_empty() {
            return Ok(());
        }

        self.apply(Action::MessagePending(Message {
            sender: self.sender.clone(),
            message: input.to_string(),
            timestamp: None,
        }));

        match self.client.send_message(chat_id, &self.sender, input).await {
            Ok(resp) => {
                if let Some(name) = &resp.new_chat_name {
                    debug!(chat_id, name = %name, "Chat renamed");
                }
                self.apply(Action::MessageSent(resp));
                Ok(())
            }
            Err(e) => self.fail("Error sending message", e),
        }
    }

    /// Ask the server to name a default-named chat from `text`. A chat that
    /// already has a custom name is left as is.
    pub async fn rename_from_message(&mut self, chat_id: i64, text: &str) -> Result<UpdateNameResponse> {
        match self.client.update_name(chat_id, text).await {
            Ok(resp) => {
                if let (true, Some(name)) = (resp.success, &resp.new_chat_name) {
                    self.apply(Action::ChatRenamed {
                        chat_id,
                        name: name.clone(),
                    });
                }
                Ok(resp)
            }
            Err(e) => self.fail("Error updating chat name", e),
        }
    }

    /// Delete everything on the server and clear local state.
    pub async fn reset(&mut self) -> Result<()> {
        match self.client.reset().await {
            Ok(_) => {
                self.apply(Action::Cleared);
                Ok(())
            }
            Err(e) => self.fail("Error resetting", e),
        }
    }
}
