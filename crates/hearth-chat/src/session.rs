//! Session identifier management.
//!
//! The session token is an opaque client-generated string correlating chat
//! turns with server-side conversational state. It is created lazily, held
//! in process memory only, and regenerated after an explicit reset.

use std::sync::Mutex;

use rand::Rng;
use tracing::debug;

/// Lazily-created, resettable session token.
///
/// Token format: `session_<millis>_<9 alphanumeric>`. Uniqueness is
/// best-effort, not cryptographically guaranteed.
#[derive(Debug, Default)]
pub struct SessionManager {
    token: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current token, creating one if none exists.
    pub fn session_id(&self) -> String {
        let mut token = match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        token.get_or_insert_with(generate_token).clone()
    }

    /// Current token without creating one.
    pub fn current(&self) -> Option<String> {
        match self.token.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the token with one assigned by the backend.
    pub fn adopt(&self, new_token: String) {
        let mut token = match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *token = Some(new_token);
    }

    /// Clear the token, returning the old one so the caller can notify the
    /// backend. The next `session_id()` call mints a fresh token.
    pub fn reset(&self) -> Option<String> {
        let mut token = match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let old = token.take();
        if let Some(ref t) = old {
            debug!("Session reset, releasing {}", t);
        }
        old
    }
}

fn generate_token() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    format!("session_{}_{}", millis, suffix)
}
