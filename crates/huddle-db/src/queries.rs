use huddle_types::api::RenameOutcome;
use huddle_types::models::{CHAT_WELCOME_TEXT, Chat, GROUP_WELCOME_TEXT, GroupWithChats, Message};
use huddle_types::naming::{self, DEFAULT_CHAT_PREFIX};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

use crate::models::{ChatRow, GroupRow, decode_messages, encode_messages};
use crate::{Database, DbError, Result};

/// What a send did to the chat: the rename step's result and the full log
/// after the append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub rename: RenameOutcome,
    pub messages: Vec<Message>,
}

impl Database {
    // -- Groups --

    /// Creates the group and its default chat in one transaction.
    pub fn create_group(&self, name: &str) -> Result<GroupWithChats> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            tx.execute("INSERT INTO chat_groups (name) VALUES (?1)", [name])?;
            let group_id = tx.last_insert_rowid();

            let chat = insert_chat(
                &tx,
                group_id,
                &naming::first_chat_name(),
                vec![Message::system(GROUP_WELCOME_TEXT)],
            )?;

            tx.commit()?;
            info!(group_id, chat_id = chat.id, "Group created");

            Ok(GroupWithChats {
                id: group_id,
                name: name.to_string(),
                chats: vec![chat],
            })
        })
    }

    /// All groups with their chats, ordered by group id then chat id.
    pub fn list_groups(&self) -> Result<Vec<GroupWithChats>> {
        self.with_conn(query_groups_with_chats)
    }

    /// Deletes every group; their chats go with them via the cascade.
    pub fn delete_all_groups(&self) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM chat_groups", [])?))
    }

    // -- Chats --

    /// Creates a chat in `group_id`. Without a name the chat is called
    /// `"New Chat N"` where N is one past the group's current chat count.
    pub fn create_chat(&self, group_id: i64, name: Option<&str>) -> Result<Chat> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if query_group(&tx, group_id)?.is_none() {
                return Err(DbError::GroupNotFound(group_id));
            }

            let name = match name {
                Some(name) => name.to_string(),
                None => naming::default_chat_name(count_chats_in_group(&tx, group_id)? + 1),
            };

            let chat = insert_chat(&tx, group_id, &name, vec![Message::system(CHAT_WELCOME_TEXT)])?;

            tx.commit()?;
            info!(group_id, chat_id = chat.id, name = %chat.name, "Chat created");
            Ok(chat)
        })
    }

    pub fn get_chat(&self, id: i64) -> Result<Chat> {
        self.with_conn(|conn| {
            query_chat(conn, id)?
                .ok_or(DbError::ChatNotFound(id))?
                .into_chat()
        })
    }

    pub fn list_chats(&self) -> Result<Vec<Chat>> {
        self.with_conn(query_chats)
    }

    pub fn delete_all_chats(&self) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM chats", [])?))
    }

    /// Deletes all chats, then all groups.
    pub fn reset(&self) -> Result<(usize, usize)> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let chats = tx.execute("DELETE FROM chats", [])?;
            let groups = tx.execute("DELETE FROM chat_groups", [])?;
            tx.commit()?;
            Ok((chats, groups))
        })
    }

    // -- Messages --

    pub fn get_messages(&self, chat_id: i64) -> Result<Vec<Message>> {
        Ok(self.get_chat(chat_id)?.messages)
    }

    /// Renames a default-named chat from `text`; any other chat keeps its name.
    pub fn rename_from_message(&self, chat_id: i64, text: &str) -> Result<RenameOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let chat = query_chat(&tx, chat_id)?.ok_or(DbError::ChatNotFound(chat_id))?;
            let outcome = rename_if_default(&tx, chat_id, &chat.name, text)?;

            tx.commit()?;
            Ok(outcome)
        })
    }

    /// Appends a message, renaming the chat first if it is still default-named.
    ///
    /// Read, rename and write-back happen in one immediate transaction, so
    /// concurrent sends to the same chat cannot drop each other's messages.
    /// A corrupt stored log aborts the send before anything is written.
    pub fn send_message(&self, chat_id: i64, sender: &str, text: &str) -> Result<SendOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let chat = query_chat(&tx, chat_id)?.ok_or(DbError::ChatNotFound(chat_id))?;
            let mut messages = decode_messages(chat_id, chat.messages.as_deref())?;

            let rename = if messages.is_empty() || naming::is_default_name(&chat.name) {
                rename_if_default(&tx, chat_id, &chat.name, text)?
            } else {
                RenameOutcome::Unchanged(chat.name)
            };

            messages.push(Message::new(sender, text));
            write_messages(&tx, chat_id, &messages)?;

            tx.commit()?;
            debug!(chat_id, count = messages.len(), renamed = rename.is_renamed(), "Message appended");

            Ok(SendOutcome { rename, messages })
        })
    }
}

fn insert_chat(conn: &Connection, group_id: i64, name: &str, messages: Vec<Message>) -> Result<Chat> {
    conn.execute(
        "INSERT INTO chats (group_id, name, messages) VALUES (?1, ?2, ?3)",
        rusqlite::params![group_id, name, encode_messages(&messages)?],
    )?;

    Ok(Chat {
        id: conn.last_insert_rowid(),
        group_id,
        name: name.to_string(),
        messages,
    })
}

fn query_group(conn: &Connection, id: i64) -> Result<Option<GroupRow>> {
    conn.query_row("SELECT id, name FROM chat_groups WHERE id = ?1", [id], |row| {
        Ok(GroupRow {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })
    .optional()
}

fn query_chat(conn: &Connection, id: i64) -> Result<Option<ChatRow>> {
    conn.query_row(
        "SELECT id, group_id, name, messages FROM chats WHERE id = ?1",
        [id],
        |row| {
            Ok(ChatRow {
                id: row.get(0)?,
                group_id: row.get(1)?,
                name: row.get(2)?,
                messages: row.get(3)?,
            })
        },
    )
    .optional()
}

fn query_chats(conn: &Connection) -> Result<Vec<Chat>> {
    let mut stmt = conn.prepare("SELECT id, group_id, name, messages FROM chats ORDER BY id")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ChatRow {
                id: row.get(0)?,
                group_id: row.get(1)?,
                name: row.get(2)?,
                messages: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(ChatRow::into_chat).collect()
}

fn query_groups_with_chats(conn: &Connection) -> Result<Vec<GroupWithChats>> {
    // One LEFT JOIN instead of a chat query per group
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, c.id, c.group_id, c.name, c.messages
         FROM chat_groups g
         LEFT JOIN chats c ON c.group_id = g.id
         ORDER BY g.id, c.id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            let group = GroupRow {
                id: row.get(0)?,
                name: row.get(1)?,
            };
            let chat = match row.get::<_, Option<i64>>(2)? {
                Some(id) => Some(ChatRow {
                    id,
                    group_id: row.get(3)?,
                    name: row.get(4)?,
                    messages: row.get(5)?,
                }),
                None => None,
            };
            Ok((group, chat))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut groups: Vec<GroupWithChats> = Vec::new();
    for (group, chat) in rows {
        if groups.last().map(|g| g.id) != Some(group.id) {
            groups.push(GroupWithChats {
                id: group.id,
                name: group.name,
                chats: Vec::new(),
            });
        }
        if let (Some(chat), Some(current)) = (chat, groups.last_mut()) {
            current.chats.push(chat.into_chat()?);
        }
    }

    Ok(groups)
}

fn count_chats_in_group(conn: &Connection, group_id: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM chats WHERE group_id = ?1",
        [group_id],
        |row| row.get(0),
    )?)
}

fn write_messages(conn: &Connection, chat_id: i64, messages: &[Message]) -> Result<()> {
    conn.execute(
        "UPDATE chats SET messages = ?1 WHERE id = ?2",
        rusqlite::params![encode_messages(messages)?, chat_id],
    )?;
    Ok(())
}

/// Conditional rename: the UPDATE only matches while the stored name still
/// carries the default prefix.
fn rename_if_default(
    conn: &Connection,
    chat_id: i64,
    current_name: &str,
    text: &str,
) -> Result<RenameOutcome> {
    let candidate = naming::derive_chat_name(text);

    let changed = conn.execute(
        "UPDATE chats SET name = ?1 WHERE id = ?2 AND substr(name, 1, ?3) = ?4",
        rusqlite::params![
            candidate,
            chat_id,
            DEFAULT_CHAT_PREFIX.chars().count() as i64,
            DEFAULT_CHAT_PREFIX
        ],
    )?;

    if changed == 1 {
        info!(chat_id, from = %current_name, to = %candidate, "Chat renamed from message");
        Ok(RenameOutcome::Renamed(candidate))
    } else {
        Ok(RenameOutcome::Unchanged(current_name.to_string()))
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
