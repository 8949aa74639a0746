//! Search orchestrator: composes a user utterance, conversation history,
//! and current filters into one backend turn.
//!
//! Concurrency model: at most one outstanding search at a time (re-entrant
//! sends are rejected, not queued), and every response is stamped with the
//! conversation generation captured at send time so a reply that lands
//! after a clear is dropped instead of being applied to newer state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use hearth_client::wire::{ChatRequest, ChatTurn};
use hearth_client::ApiClient;
use hearth_core::filters::{Filters, TransactionType};
use hearth_core::types::Message;

use crate::conversation::ConversationStore;
use crate::error::ChatError;
use crate::notify::NotificationSink;
use crate::session::SessionManager;

/// Utterances containing any of these are treated as property searches
/// and get a transaction-type suffix when they name none themselves.
const PROPERTY_KEYWORDS: &[&str] = &[
    "find",
    "show",
    "search",
    "properties",
    "house",
    "apartment",
    "condo",
    "home",
    "bedroom",
    "bath",
    "price",
    "location",
    "under",
    "over",
    "sqft",
    "square feet",
    "luxury",
    "modern",
];

/// Assistant text when the backend reply carries no response.
const EMPTY_REPLY: &str = "No matching properties found.";

/// Fallback assistant text for a failed search turn.
const ERROR_REPLY: &str =
    "Sorry, I encountered an error while searching for properties. Please try again.";

/// Result of one `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply applied: assistant turn appended, filters merged back.
    Completed,
    /// Backend call failed; a fallback assistant turn was appended.
    Failed,
    /// Another search was already in flight; nothing happened.
    Skipped,
    /// The conversation was cleared mid-flight; the reply was dropped.
    Stale,
}

/// Drives `/chat` turns and keeps conversation, session, and filter state
/// coherent. All state lives behind this struct's own mutation API.
pub struct SearchOrchestrator {
    client: ApiClient,
    store: Mutex<ConversationStore>,
    filters: Mutex<Filters>,
    transaction_type: Mutex<TransactionType>,
    session: SessionManager,
    sink: Arc<dyn NotificationSink>,
    in_flight: AtomicBool,
    generation: AtomicU64,
}

/// Clears the in-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SearchOrchestrator {
    pub fn new(
        client: ApiClient,
        store: ConversationStore,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            client,
            store: Mutex::new(store),
            filters: Mutex::new(Filters::default()),
            transaction_type: Mutex::new(TransactionType::default()),
            session: SessionManager::new(),
            sink,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Send one user utterance through a full search turn.
    ///
    /// Appends the (possibly augmented) user turn, calls the backend with
    /// the mapped history, merges inferred filters back, and appends the
    /// assistant turn. Transport failures are recovered locally and
    /// reported through the notification sink; `Err` is reserved for
    /// state-handling bugs.
    pub async fn send(
        &self,
        utterance: &str,
        override_transaction: Option<TransactionType>,
    ) -> Result<SendOutcome, ChatError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Search already in flight, ignoring send");
            return Ok(SendOutcome::Skipped);
        }
        let _guard = FlightGuard(&self.in_flight);
        let generation = self.generation.load(Ordering::SeqCst);

        let transaction = override_transaction.unwrap_or_else(|| self.transaction_type());
        let enhanced = augment_utterance(utterance, transaction);

        let history = {
            let mut store = self.lock_store()?;
            let mut history = store.history_turns();
            history.push(ChatTurn::user(enhanced.clone()));
            store.add_message(Message::user(enhanced.clone()));
            history
        };

        let request = ChatRequest {
            message: enhanced,
            history,
            session_id: self.session.session_id(),
        };

        let result = self.client.chat(&request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping reply for a cleared conversation");
            return Ok(SendOutcome::Stale);
        }

        match result {
            Ok(reply) => {
                if let Some(sid) = reply.session_id {
                    self.session.adopt(sid);
                }
                if let Some(parsed) = reply.parsed_filters {
                    let inferred = parsed.to_filters();
                    if let Some(tx) = inferred.transaction_type {
                        *self.lock_transaction()? = tx;
                    }
                    self.lock_filters()?.merge(inferred);
                }

                let content = if reply.response.is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    reply.response
                };
                let properties = if reply.results.is_empty() {
                    None
                } else {
                    Some(reply.results)
                };

                let mut store = self.lock_store()?;
                store.add_message(Message::assistant(content, properties));
                store.set_has_searched(true);
                Ok(SendOutcome::Completed)
            }
            Err(e) => {
                error!("Search request failed: {}", e);
                {
                    let mut store = self.lock_store()?;
                    store.add_message(Message::assistant(ERROR_REPLY, None));
                    store.set_has_searched(true);
                }
                self.sink.notify(
                    "Error",
                    "Failed to get a response from the real estate assistant",
                );
                Ok(SendOutcome::Failed)
            }
        }
    }

    /// Reset the conversation: welcome-only log, wiped persistence, fresh
    /// session. The backend is told to release the old session on a
    /// detached task whose failure is only logged.
    pub fn clear_conversation(&self) -> Result<(), ChatError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.lock_store()?.clear();

        if let Some(old) = self.session.reset() {
            let client = self.client.clone();
            tokio::spawn(async move {
                if let Err(e) = client.clear_session(&old).await {
                    warn!("Failed to clear backend session {}: {}", old, e);
                }
            });
        }
        Ok(())
    }

    /// Best-effort restore of the persisted conversation; never fails.
    pub fn restore(&self) {
        match self.store.lock() {
            Ok(mut store) => store.restore(),
            Err(e) => error!("Conversation lock poisoned during restore: {}", e),
        }
    }

    // -- State accessors --

    pub fn messages(&self) -> Vec<Message> {
        self.store
            .lock()
            .map(|s| s.messages().to_vec())
            .unwrap_or_default()
    }

    pub fn has_searched(&self) -> bool {
        self.store.lock().map(|s| s.has_searched()).unwrap_or(false)
    }

    pub fn filters(&self) -> Filters {
        self.filters.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Additive merge of user-edited filters (chat-page semantics).
    pub fn merge_filters(&self, edits: Filters) -> Result<(), ChatError> {
        self.lock_filters()?.merge(edits);
        Ok(())
    }

    pub fn clear_filters(&self) -> Result<(), ChatError> {
        self.lock_filters()?.clear();
        Ok(())
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
            .lock()
            .map(|t| *t)
            .unwrap_or_default()
    }

    /// Select buy/rent; also recorded as an active filter, matching the
    /// toggle behavior of the search view.
    pub fn set_transaction_type(&self, tx: TransactionType) -> Result<(), ChatError> {
        *self.lock_transaction()? = tx;
        self.lock_filters()?.transaction_type = Some(tx);
        Ok(())
    }

    pub fn session_id(&self) -> String {
        self.session.session_id()
    }

    // -- Lock helpers --

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, ConversationStore>, ChatError> {
        self.store
            .lock()
            .map_err(|e| ChatError::State(format!("conversation lock poisoned: {}", e)))
    }

    fn lock_filters(&self) -> Result<std::sync::MutexGuard<'_, Filters>, ChatError> {
        self.filters
            .lock()
            .map_err(|e| ChatError::State(format!("filter lock poisoned: {}", e)))
    }

    fn lock_transaction(&self) -> Result<std::sync::MutexGuard<'_, TransactionType>, ChatError> {
        self.transaction_type
            .lock()
            .map_err(|e| ChatError::State(format!("transaction lock poisoned: {}", e)))
    }
}

/// Add a transaction-type suffix to property-search utterances that do
/// not already name buy, rent, or sale.
fn augment_utterance(content: &str, transaction: TransactionType) -> String {
    let lower = content.to_lowercase();
    let is_property_search = PROPERTY_KEYWORDS.iter().any(|k| lower.contains(k));
    let names_transaction =
        lower.contains("buy") || lower.contains("rent") || lower.contains("sale");
    if is_property_search && !names_transaction {
        format!("{} for {}", content, transaction)
    } else {
        content.to_string()
    }
}
