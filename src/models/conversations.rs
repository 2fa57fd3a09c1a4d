use serde::{Deserialize, Serialize};

/// Transient stand-in shown while the backend is generating a reply. Rendered
/// through the markdown pipeline, so the asterisks read as italics.
pub const PLACEHOLDER_CONTENT: &str = "*Generating...*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, rename = "isPlaceholder", skip_serializing_if = "is_false")]
    pub is_placeholder: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
            is_placeholder: false,
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message {
            role: Role::Ai,
            content: content.into(),
            is_placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Message {
            role: Role::Ai,
            content: PLACEHOLDER_CONTENT.to_string(),
            is_placeholder: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub date: String,
    pub thread_id: String,
    pub title: String,
}

/// In-memory chat state: the transcript, the selected thread and the sidebar
/// list. All transitions live here so they can be tested without a DOM; the
/// component wraps one of these in a signal and forwards events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub messages: Vec<Message>,
    pub thread_id: Option<String>,
    pub conversations: Vec<ConversationMetadata>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimistically appends the user's message plus a generating
    /// placeholder. Returns false (and changes nothing) for blank input.
    /// At most one placeholder exists per exchange and it is always last.
    pub fn begin_exchange(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }
        self.messages.push(Message::user(input));
        self.messages.push(Message::placeholder());
        true
    }

    /// Swaps the trailing placeholder for the real reply.
    pub fn resolve_reply(&mut self, content: String) {
        self.messages.pop();
        self.messages.push(Message::ai(content));
    }

    /// Rolls the transcript back to its pre-send state: the placeholder and
    /// the optimistic user message both go. No-op when nothing is pending.
    pub fn revert_exchange(&mut self) {
        if self.has_pending_reply() {
            self.messages.truncate(self.messages.len().saturating_sub(2));
        }
    }

    pub fn has_pending_reply(&self) -> bool {
        self.messages.last().is_some_and(|m| m.is_placeholder)
    }

    pub fn select_thread(&mut self, thread_id: &str) {
        self.messages.clear();
        self.thread_id = Some(thread_id.to_string());
    }

    pub fn load_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Drops the thread selection without touching the transcript; used when
    /// a thread fetch fails after the selection was already made.
    pub fn clear_selection(&mut self) {
        self.thread_id = None;
    }

    pub fn start_new(&mut self) {
        self.thread_id = None;
        self.messages.clear();
    }

    pub fn set_conversations(&mut self, conversations: Vec<ConversationMetadata>) {
        self.conversations = conversations;
    }

    /// Called once the backend has persisted a fresh thread for an exchange
    /// begun with no selection.
    pub fn adopt_thread(&mut self, thread_id: String) {
        self.thread_id = Some(thread_id);
    }

    pub fn is_active(&self, thread_id: &str) -> bool {
        self.thread_id.as_deref() == Some(thread_id)
    }

    /// Removes a deleted thread from the sidebar list; when it was the active
    /// one the transcript and selection reset too. Returns whether the active
    /// thread was the one removed.
    pub fn apply_deletion(&mut self, thread_id: &str) -> bool {
        let was_active = self.is_active(thread_id);
        self.conversations.retain(|c| c.thread_id != thread_id);
        if was_active {
            self.start_new();
        }
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(thread_id: &str, title: &str) -> ConversationMetadata {
        ConversationMetadata {
            date: "2025-06-01T12:00:00".to_string(),
            thread_id: thread_id.to_string(),
            title: title.to_string(),
        }
    }

    fn placeholder_count(session: &Session) -> usize {
        session.messages.iter().filter(|m| m.is_placeholder).count()
    }

    #[test]
    fn send_appends_user_message_and_placeholder() {
        let mut session = Session::new();

        assert!(session.begin_exchange("hello there"));

        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[0].content, "hello there");
        assert_eq!(placeholder_count(&session), 1);

        let last = session.messages.last().unwrap();
        assert!(last.is_placeholder);
        assert_eq!(last.role, Role::Ai);
        assert_eq!(last.content, PLACEHOLDER_CONTENT);
        assert!(session.has_pending_reply());
    }

    #[test]
    fn blank_input_changes_nothing() {
        let mut session = Session::new();
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        assert!(!session.begin_exchange(""));
        assert!(!session.begin_exchange("   "));
        assert!(!session.begin_exchange("\t\n"));

        assert_eq!(session.messages.len(), 2);
        assert_eq!(placeholder_count(&session), 0);
    }

    #[test]
    fn resolve_swaps_placeholder_for_reply() {
        let mut session = Session::new();
        session.begin_exchange("what is rust?");

        session.resolve_reply("A systems language.".to_string());

        assert_eq!(session.messages.len(), 2);
        assert_eq!(placeholder_count(&session), 0);
        let last = session.messages.last().unwrap();
        assert_eq!(last.role, Role::Ai);
        assert_eq!(last.content, "A systems language.");
        assert!(!session.has_pending_reply());
    }

    #[test]
    fn revert_restores_pre_send_transcript() {
        let mut session = Session::new();
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        session.begin_exchange("and another thing");
        assert_eq!(session.messages.len(), 4);

        session.revert_exchange();

        assert_eq!(session.messages.len(), 2);
        assert_eq!(placeholder_count(&session), 0);
        assert_eq!(session.messages[1].content, "hey");
    }

    #[test]
    fn revert_without_pending_reply_is_a_no_op() {
        let mut session = Session::new();
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        session.revert_exchange();

        assert_eq!(session.messages.len(), 2);
    }

    #[test]
    fn placeholder_is_gone_after_each_exchange() {
        let mut session = Session::new();

        session.begin_exchange("first");
        assert_eq!(placeholder_count(&session), 1);
        session.resolve_reply("first reply".to_string());
        assert_eq!(placeholder_count(&session), 0);

        session.begin_exchange("second");
        assert_eq!(placeholder_count(&session), 1);
        assert!(session.messages.last().unwrap().is_placeholder);
        session.revert_exchange();
        assert_eq!(placeholder_count(&session), 0);
        assert_eq!(session.messages.len(), 2);
    }

    #[test]
    fn selecting_a_thread_clears_the_transcript() {
        let mut session = Session::new();
        session.load_messages(vec![Message::user("old"), Message::ai("old reply")]);

        session.select_thread("thread-2");

        assert!(session.messages.is_empty());
        assert_eq!(session.thread_id.as_deref(), Some("thread-2"));
    }

    #[test]
    fn failed_thread_fetch_clears_the_selection() {
        let mut session = Session::new();
        session.select_thread("thread-2");

        session.clear_selection();

        assert_eq!(session.thread_id, None);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn new_conversation_resets_thread_and_messages() {
        let mut session = Session::new();
        session.select_thread("thread-1");
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        session.start_new();

        assert_eq!(session.thread_id, None);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn deleting_the_active_thread_resets_the_session() {
        let mut session = Session::new();
        session.set_conversations(vec![meta("a", "Trip"), meta("b", "Groceries")]);
        session.select_thread("a");
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        let was_active = session.apply_deletion("a");

        assert!(was_active);
        assert_eq!(session.conversations.len(), 1);
        assert_eq!(session.conversations[0].thread_id, "b");
        assert_eq!(session.thread_id, None);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn deleting_another_thread_only_shrinks_the_list() {
        let mut session = Session::new();
        session.set_conversations(vec![meta("a", "Trip"), meta("b", "Groceries")]);
        session.select_thread("a");
        session.load_messages(vec![Message::user("hi"), Message::ai("hey")]);

        let was_active = session.apply_deletion("b");

        assert!(!was_active);
        assert_eq!(session.conversations.len(), 1);
        assert_eq!(session.conversations[0].thread_id, "a");
        assert_eq!(session.thread_id.as_deref(), Some("a"));
        assert_eq!(session.messages.len(), 2);
    }

    #[test]
    fn adopting_a_thread_keeps_the_transcript() {
        let mut session = Session::new();
        session.begin_exchange("make me a thread");

        session.adopt_thread("user-1--make-me-a-thread".to_string());

        assert_eq!(
            session.thread_id.as_deref(),
            Some("user-1--make-me-a-thread")
        );
        assert_eq!(session.messages.len(), 2);
    }

    #[test]
    fn stored_messages_deserialize_without_placeholder_flag() {
        let raw = r#"[{"role":"user","content":"hi"},{"role":"ai","content":"hey"}]"#;
        let messages: Vec<Message> = serde_json::from_str(raw).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Ai);
        assert!(messages.iter().all(|m| !m.is_placeholder));
    }
}
