//! Client state as a single normalized store.
//!
//! Groups and chats are each kept once, keyed by id; the sidebar and the
//! active thread are derived from them. Every change goes through
//! [`reduce`], so a rename is visible everywhere the chat is shown.

use std::collections::BTreeMap;

use huddle_types::api::SendMessageResponse;
use huddle_types::models::{Chat, Group, GroupWithChats, Message};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    groups: BTreeMap<i64, Group>,
    chats: BTreeMap<i64, Chat>,
    active_chat_id: Option<i64>,
    /// Messages shown for the active chat, including optimistic ones.
    thread: Vec<Message>,
    last_error: Option<String>,
    groups_created: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Full server snapshot: replaces every group and chat.
    GroupsLoaded(Vec<GroupWithChats>),
    /// Flat chat list: replaces the chat cache, groups are kept.
    ChatsLoaded(Vec<Chat>),
    /// A group was created; its first chat becomes active.
    GroupCreated(GroupWithChats),
    /// A chat was created; it becomes active.
    ChatCreated(Chat),
    ChatSelected(i64),
    MessagesLoaded { chat_id: i64, messages: Vec<Message> },
    /// Loading a thread failed; the thread falls back to empty.
    MessagesFailed { chat_id: i64, error: String },
    /// Optimistic append to the active thread before the server answers.
    MessagePending(Message),
    MessageSent(SendMessageResponse),
    ChatRenamed { chat_id: i64, name: String },
    RequestFailed(String),
    Cleared,
}

/// Pure state transition.
pub fn reduce(mut state: ClientState, action: Action) -> ClientState {
    match action {
        Action::GroupsLoaded(groups) => {
            state.groups.clear();
            state.chats.clear();
            for group in groups {
                state.insert_group(group);
            }
            if !state.active_chat_id.is_some_and(|id| state.chats.contains_key(&id)) {
                state.active_chat_id = None;
                state.thread.clear();
            }
            state.last_error = None;
        }
        Action::ChatsLoaded(chats) => {
            state.chats = chats.into_iter().map(|c| (c.id, c)).collect();
            state.last_error = None;
        }
        Action::GroupCreated(group) => {
            let first_chat = group.chats.first().map(|c| (c.id, c.messages.clone()));
            state.insert_group(group);
            state.groups_created += 1;
            state.active_chat_id = first_chat.as_ref().map(|(id, _)| *id);
            state.thread = first_chat.map(|(_, messages)| messages).unwrap_or_default();
            state.last_error = None;
        }
        Action::ChatCreated(chat) => {
            state.active_chat_id = Some(chat.id);
            state.thread = chat.messages.clone();
            state.chats.insert(chat.id, chat);
            state.last_error = None;
        }
        Action::ChatSelected(chat_id) => {
            // An uncached chat opens with an empty thread until its messages load
            state.thread = state
                .chats
                .get(&chat_id)
                .map(|chat| chat.messages.clone())
                .unwrap_or_default();
            state.active_chat_id = Some(chat_id);
        }
        Action::MessagesLoaded { chat_id, messages } => {
            if state.active_chat_id == Some(chat_id) {
                state.thread = messages.clone();
            }
            if let Some(chat) = state.chats.get_mut(&chat_id) {
                chat.messages = messages;
            }
            state.last_error = None;
        }
        Action::MessagesFailed { chat_id, error } => {
            if state.active_chat_id == Some(chat_id) {
                state.thread.clear();
            }
            state.last_error = Some(error);
        }
        Action::MessagePending(message) => {
            if state.active_chat_id.is_some() {
                state.thread.push(message);
            }
        }
        Action::MessageSent(resp) => {
            if let Some(chat) = state.chats.get_mut(&resp.chat_id) {
                chat.name = resp.chat_name;
                chat.messages = resp.messages.clone();
            }
            if state.active_chat_id == Some(resp.chat_id) && !resp.messages.is_empty() {
                state.thread = resp.messages;
            }
            state.last_error = None;
        }
        Action::ChatRenamed { chat_id, name } => {
            if let Some(chat) = state.chats.get_mut(&chat_id) {
                chat.name = name;
            }
        }
        Action::RequestFailed(error) => {
            state.last_error = Some(error);
        }
        Action::Cleared => {
            let groups_created = state.groups_created;
            state = ClientState {
                groups_created,
                ..ClientState::default()
            };
        }
    }
    state
}

/// One chat row in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// A sidebar section: a group and its chats in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: i64,
    pub name: String,
    pub chats: Vec<ChatSummary>,
}

impl ClientState {
    fn insert_group(&mut self, group: GroupWithChats) {
        self.groups.insert(group.id, group.group());
        for chat in group.chats {
            self.chats.insert(chat.id, chat);
        }
    }

    pub fn group(&self, id: i64) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn chat(&self, id: i64) -> Option<&Chat> {
        self.chats.get(&id)
    }

    pub fn chats_in_group(&self, group_id: i64) -> impl Iterator<Item = &Chat> + '_ {
        self.chats.values().filter(move |c| c.group_id == group_id)
    }

    pub fn sidebar(&self) -> Vec<GroupView> {
        self.groups
            .values()
            .map(|group| GroupView {
                id: group.id,
                name: group.name.clone(),
                chats: self
                    .chats_in_group(group.id)
                    .map(|chat| ChatSummary {
                        id: chat.id,
                        name: chat.name.clone(),
                        active: self.active_chat_id == Some(chat.id),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn active_chat_id(&self) -> Option<i64> {
        self.active_chat_id
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        self.active_chat_id.and_then(|id| self.chats.get(&id))
    }

    pub fn thread(&self) -> &[Message] {
        &self.thread
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Name for the next group created from this client: `"Group N"`.
    pub fn next_group_name(&self) -> String {
        format!("Group {}", self.groups_created + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(id: i64, group_id: i64, name: &str) -> Chat {
        Chat {
            id,
            group_id,
            name: name.to_string(),
            messages: vec![Message::system("Hi, how can I help you?")],
        }
    }

    fn group(id: i64, name: &str, chats: Vec<Chat>) -> GroupWithChats {
        GroupWithChats {
            id,
            name: name.to_string(),
            chats,
        }
    }

    fn loaded() -> ClientState {
        reduce(
            ClientState::default(),
            Action::GroupsLoaded(vec![
                group(1, "Support", vec![chat(10, 1, "New Chat 1"), chat(11, 1, "Billing")]),
                group(2, "Sales", vec![chat(20, 2, "New Chat 1")]),
            ]),
        )
    }

    #[test]
    fn sidebar_is_derived_from_the_store() {
        let state = reduce(loaded(), Action::ChatSelected(11));
        let sidebar = state.sidebar();

        assert_eq!(sidebar.len(), 2);
        assert_eq!(sidebar[0].name, "Support");
        let names: Vec<&str> = sidebar[0].chats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["New Chat 1", "Billing"]);
        assert!(sidebar[0].chats[1].active);
        assert!(!sidebar[1].chats[0].active);
    }

    #[test]
    fn group_created_activates_its_first_chat() {
        let state = reduce(
            ClientState::default(),
            Action::GroupCreated(group(5, "Group 1", vec![chat(50, 5, "New Chat 1")])),
        );
        assert_eq!(state.active_chat_id(), Some(50));
        assert_eq!(state.thread().len(), 1);
        assert_eq!(state.next_group_name(), "Group 2");
    }

    #[test]
    fn rename_is_visible_from_every_view() {
        let state = reduce(loaded(), Action::ChatSelected(10));
        let state = reduce(
            state,
            Action::ChatRenamed {
                chat_id: 10,
                name: "Printer jam".into(),
            },
        );

        assert_eq!(state.active_chat().unwrap().name, "Printer jam");
        assert_eq!(state.sidebar()[0].chats[0].name, "Printer jam");
        assert_eq!(state.chats_in_group(1).next().unwrap().name, "Printer jam");
    }

    #[test]
    fn optimistic_message_is_reconciled_by_server_log() {
        let state = reduce(loaded(), Action::ChatSelected(10));
        let state = reduce(
            state,
            Action::MessagePending(Message {
                sender: "user".into(),
                message: "Printer jam on floor 3".into(),
                timestamp: None,
            }),
        );
        assert_eq!(state.thread().len(), 2);

        let mut log = state.chat(10).unwrap().messages.clone();
        log.push(Message::new("user", "Printer jam on floor 3"));
        let state = reduce(
            state,
            Action::MessageSent(SendMessageResponse {
                chat_id: 10,
                chat_name: "Printer jam on floor".into(),
                new_chat_name: Some("Printer jam on floor".into()),
                messages: log.clone(),
            }),
        );

        assert_eq!(state.thread(), log.as_slice());
        assert_eq!(state.chat(10).unwrap().messages, log);
        assert_eq!(state.sidebar()[0].chats[0].name, "Printer jam on floor");
    }

    #[test]
    fn pending_message_without_active_chat_is_dropped() {
        let state = reduce(loaded(), Action::MessagePending(Message::new("user", "hello")));
        assert!(state.thread().is_empty());
    }

    #[test]
    fn messages_for_inactive_chat_only_update_cache() {
        let state = reduce(loaded(), Action::ChatSelected(10));
        let before = state.thread().to_vec();
        let state = reduce(
            state,
            Action::MessagesLoaded {
                chat_id: 20,
                messages: vec![],
            },
        );
        assert_eq!(state.thread(), before.as_slice());
        assert!(state.chat(20).unwrap().messages.is_empty());
    }

    #[test]
    fn failed_load_empties_thread_and_records_error() {
        let state = reduce(loaded(), Action::ChatSelected(10));
        let state = reduce(
            state,
            Action::MessagesFailed {
                chat_id: 10,
                error: "NotFound (404): chat 10 not found".into(),
            },
        );
        assert!(state.thread().is_empty());
        assert_eq!(state.last_error(), Some("NotFound (404): chat 10 not found"));

        let state = reduce(
            state,
            Action::MessagesLoaded {
                chat_id: 10,
                messages: vec![],
            },
        );
        assert!(state.last_error().is_none());
    }

    #[test]
    fn selecting_uncached_chat_waits_for_its_thread() {
        let state = reduce(loaded(), Action::ChatSelected(10));
        let state = reduce(state, Action::ChatSelected(999));
        assert_eq!(state.active_chat_id(), Some(999));
        assert!(state.thread().is_empty());

        let state = reduce(
            state,
            Action::MessagesLoaded {
                chat_id: 999,
                messages: vec![Message::system("from elsewhere")],
            },
        );
        assert_eq!(state.thread().len(), 1);
        assert_eq!(state.thread()[0].message, "from elsewhere");
    }

    #[test]
    fn snapshot_drops_vanished_active_chat() {
        let state = reduce(loaded(), Action::ChatSelected(20));
        let state = reduce(
            state,
            Action::GroupsLoaded(vec![group(1, "Support", vec![chat(10, 1, "New Chat 1")])]),
        );
        assert!(state.active_chat().is_none());
        assert!(state.thread().is_empty());
        assert!(state.group(2).is_none());
    }

    #[test]
    fn chats_loaded_replaces_chat_cache_only() {
        let state = reduce(
            loaded(),
            Action::ChatsLoaded(vec![chat(10, 1, "Printer jam"), chat(12, 2, "New Chat 2")]),
        );
        assert!(state.chat(11).is_none());
        assert_eq!(state.chat(10).unwrap().name, "Printer jam");
        assert_eq!(state.sidebar().len(), 2);
        assert_eq!(state.sidebar()[1].chats[0].id, 12);
    }

    #[test]
    fn cleared_keeps_group_counter() {
        let state = reduce(
            ClientState::default(),
            Action::GroupCreated(group(5, "Group 1", vec![chat(50, 5, "New Chat 1")])),
        );
        let state = reduce(state, Action::Cleared);
        assert!(state.sidebar().is_empty());
        assert!(state.active_chat().is_none());
        assert_eq!(state.next_group_name(), "Group 2");
    }
}
