//! Conversational search core.
//!
//! Owns the session identifier, the conversation log with its local
//! persistence, the search orchestrator that drives `/chat` turns, and the
//! debounced listing controller for the all-properties view. All shared
//! state is mutated only through the owning component's API.

pub mod conversation;
pub mod debounce;
pub mod error;
pub mod listing;
pub mod notify;
pub mod orchestrator;
pub mod session;

pub use conversation::{ConversationStore, CONVERSATION_KEY, HAS_SEARCHED_KEY};
pub use debounce::Debouncer;
pub use error::ChatError;
pub use listing::ListingController;
pub use notify::{NotificationSink, TracingSink};
pub use orchestrator::{SearchOrchestrator, SendOutcome};
pub use session::SessionManager;
