//! Chat naming policy.
//!
//! New chats get a system-assigned `"New Chat N"` name. While a chat still
//! carries that prefix it is renamed from the first characters of the next
//! message sent to it; once renamed it keeps its name for good.

pub const DEFAULT_CHAT_PREFIX: &str = "New Chat";

/// Characters of the message text kept when deriving a chat name.
pub const CHAT_NAME_MAX_CHARS: usize = 20;

/// Name given to the chat created alongside a new group.
pub fn first_chat_name() -> String {
    default_chat_name(1)
}

/// `"New Chat {n}"`.
pub fn default_chat_name(n: i64) -> String {
    format!("{} {}", DEFAULT_CHAT_PREFIX, n)
}

pub fn is_default_name(name: &str) -> bool {
    name.starts_with(DEFAULT_CHAT_PREFIX)
}

/// First [`CHAT_NAME_MAX_CHARS`] characters of `text`.
///
/// Counts chars, not bytes, so multi-byte text is never split mid-character.
pub fn derive_chat_name(text: &str) -> String {
    text.chars().take(CHAT_NAME_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_first_twenty_chars() {
        assert_eq!(derive_chat_name("Hello there, I need help"), "Hello there, I need ");
        assert_eq!(derive_chat_name("short"), "short");
    }

    #[test]
    fn derive_counts_characters_not_bytes() {
        let text = "héllo wörld ünïcödé ñame";
        let name = derive_chat_name(text);
        assert_eq!(name.chars().count(), CHAT_NAME_MAX_CHARS);
        assert!(text.starts_with(&name));
    }

    #[test]
    fn default_names() {
        assert_eq!(first_chat_name(), "New Chat 1");
        assert_eq!(default_chat_name(7), "New Chat 7");
        assert!(is_default_name("New Chat 12"));
        assert!(!is_default_name("new chat 1"));
        assert!(!is_default_name("Support thread"));
    }
}
