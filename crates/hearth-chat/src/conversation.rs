//! Conversation log with local persistence.
//!
//! The log always starts with the fixed welcome message. Appends are
//! strictly ordered by call sequence, messages are never mutated after
//! creation, and clearing resets to a single fresh welcome. Persistence
//! is a side effect of mutation and skips the lone-welcome state so that
//! the welcome alone never counts as history.

use tracing::{debug, warn};

use hearth_client::wire::ChatTurn;
use hearth_core::types::Message;
use hearth_store::FileCache;

/// Persisted key for the serialized message log.
pub const CONVERSATION_KEY: &str = "real_estate_conversation";
/// Persisted key for the "has searched" flag.
pub const HAS_SEARCHED_KEY: &str = "real_estate_has_searched";

/// Ordered conversation log plus the landing-state flag.
#[derive(Debug)]
pub struct ConversationStore {
    cache: FileCache,
    messages: Vec<Message>,
    has_searched: bool,
}

impl ConversationStore {
    /// Fresh store: welcome-only log, nothing searched yet.
    pub fn new(cache: FileCache) -> Self {
        Self {
            cache,
            messages: vec![Message::welcome()],
            has_searched: false,
        }
    }

    /// Append a message and persist.
    ///
    /// The lone-welcome state is never persisted.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > 1 {
            self.persist();
        }
    }

    /// Mark that at least one search has completed (success or failure)
    /// and persist the flag alongside the log.
    pub fn set_has_searched(&mut self, searched: bool) {
        self.has_searched = searched;
        if self.messages.len() > 1 {
            self.persist();
        }
    }

    /// Reset to a single fresh welcome message and wipe persisted state.
    ///
    /// Idempotent: clearing twice yields the same welcome-only state and
    /// an empty persisted store.
    pub fn clear(&mut self) {
        self.messages = vec![Message::welcome()];
        self.has_searched = false;
        self.cache.remove(CONVERSATION_KEY);
        self.cache.remove(HAS_SEARCHED_KEY);
    }

    /// Best-effort restore of a previously persisted log and flag.
    ///
    /// A missing, malformed, or empty payload leaves in-memory state
    /// untouched; this never fails.
    pub fn restore(&mut self) {
        match self.cache.get::<Vec<Message>>(CONVERSATION_KEY) {
            Some(saved) if !saved.is_empty() => {
                debug!("Restored {} persisted messages", saved.len());
                self.messages = saved;
            }
            Some(_) => warn!("Persisted conversation is empty, keeping current log"),
            None => {}
        }
        if let Some(saved) = self.cache.get::<bool>(HAS_SEARCHED_KEY) {
            self.has_searched = saved;
        }
    }

    /// Serialize the log and flag to the durable cache. Failures are
    /// logged inside the cache, never raised.
    pub fn persist(&self) {
        self.cache.put(CONVERSATION_KEY, &self.messages);
        self.cache.put(HAS_SEARCHED_KEY, &self.has_searched);
    }

    /// Outbound history: every turn except the welcome message, as
    /// `{role, content}` pairs in log order.
    pub fn history_turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter(|m| !m.is_welcome())
            .map(|m| {
                if m.is_user {
                    ChatTurn::user(m.content.clone())
                } else {
                    ChatTurn::assistant(m.content.clone())
                }
            })
            .collect()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }
}
