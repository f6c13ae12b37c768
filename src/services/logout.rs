//! Logout handler registration.
//!
//! ARCHITECTURE
//! ============
//! The API client must end the session when the backend rejects a token, but
//! it knows nothing about navigation or user-facing notices. The dashboard
//! shell owns those. `LogoutSlot` sits between them: the shell registers a
//! handler when its router is assembled, and the client only ever calls
//! `invoke`.
//!
//! The slot is handed to the client at construction time instead of living
//! in a static, so each composed app (and each test) gets its own.
//!
//! TRADE-OFFS
//! ==========
//! Single slot, last writer wins. Re-assembling the router replaces the
//! previous handler rather than stacking another one.

use std::sync::{Arc, PoisonError, RwLock};

use crate::gate::LOGIN_PATH;

/// User-facing notice carried across the redirect to login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SessionExpired,
}

impl Notice {
    /// Query-string value used on `/login?notice=...`.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::SessionExpired => "session-expired",
        }
    }

    #[must_use]
    pub fn from_query(raw: &str) -> Option<Self> {
        match raw {
            "session-expired" => Some(Self::SessionExpired),
            _ => None,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::SessionExpired => "Your session has expired. Please log in again.",
        }
    }
}

/// Result of ending a session: where to send the user, and what to tell them.
///
/// The credential cookie is always cleared when a `SessionEnd` is turned into
/// a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnd {
    pub redirect_to: &'static str,
    pub notice: Option<Notice>,
}

impl SessionEnd {
    /// Plain navigation to login, used when no handler is registered.
    #[must_use]
    pub fn fallback() -> Self {
        Self { redirect_to: LOGIN_PATH, notice: None }
    }

    /// Redirect target including the notice query, if any.
    #[must_use]
    pub fn location(&self) -> String {
        match self.notice {
            Some(notice) => format!("{}?notice={}", self.redirect_to, notice.as_query()),
            None => self.redirect_to.to_owned(),
        }
    }
}

/// Zero-argument async action that terminates the local session.
#[async_trait::async_trait]
pub trait LogoutHandler: Send + Sync {
    async fn logout(&self) -> SessionEnd;
}

#[derive(Default)]
pub struct LogoutSlot {
    handler: RwLock<Option<Arc<dyn LogoutHandler>>>,
}

impl LogoutSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler`, replacing any previous registration.
    pub fn register(&self, handler: Arc<dyn LogoutHandler>) {
        *self
            .handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run the registered handler, or fall back to a bare redirect to login.
    pub async fn invoke(&self) -> SessionEnd {
        // Clone out of the lock; the guard must not live across the await.
        let handler = self
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match handler {
            Some(handler) => handler.logout().await,
            None => {
                tracing::warn!("no logout handler registered; redirecting to login");
                SessionEnd::fallback()
            }
        }
    }
}

#[cfg(test)]
#[path = "logout_test.rs"]
mod tests;
