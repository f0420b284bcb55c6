//! Session ids and the signed-in user behind them.
//!
//! ARCHITECTURE
//! ============
//! Every visitor gets an opaque session id cookie (see the session
//! middleware). Signing in is handled by an external identity provider that
//! records the user against that id in a [`SessionStore`]; this crate only
//! reads the mapping and removes it on sign-out. The in-memory store can be
//! seeded at startup with fixed admin sessions from the configuration.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Mint a fresh session id.
#[must_use]
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The user signed in under `session`, if any.
    async fn user(&self, session: &str) -> Result<Option<CurrentUser>, SessionError>;
    async fn insert(&self, session: &str, user: CurrentUser) -> Result<(), SessionError>;
    /// Forget `session`. Removing an unknown session is not an error.
    async fn remove(&self, session: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    users: RwLock<HashMap<String, CurrentUser>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `sessions` already signed in.
    #[must_use]
    pub fn seeded(sessions: impl IntoIterator<Item = (String, CurrentUser)>) -> Self {
        Self { users: RwLock::new(sessions.into_iter().collect()) }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn user(&self, session: &str) -> Result<Option<CurrentUser>, SessionError> {
        Ok(self.users.read().await.get(session).cloned())
    }

    async fn insert(&self, session: &str, user: CurrentUser) -> Result<(), SessionError> {
        self.users.write().await.insert(session.to_owned(), user);
        Ok(())
    }

    async fn remove(&self, session: &str) -> Result<(), SessionError> {
        self.users.write().await.remove(session);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
