//! Contact-form messages.
//!
//! DESIGN
//! ======
//! Storage is behind [`MessageStore`]; the bundled [`MemoryMessageStore`]
//! keeps messages in a `RwLock`ed map. Ids are assigned from a counter and
//! never reused, so a deleted id stays deleted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message {0} not found")]
    NotFound(u64),
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A submitted contact form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation failures for a [`NewMessage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

impl NewMessage {
    /// Trimmed copy of the form, or the fields that failed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] when the name or message is blank or the email
    /// does not look like an address.
    pub fn validate(&self) -> Result<Self, FieldErrors> {
        let trimmed = Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            message: self.message.trim().to_owned(),
        };

        let errors = FieldErrors {
            name: trimmed.name.is_empty().then_some("Name is required."),
            email: (!looks_like_email(&trimmed.email)).then_some("Email must be a valid address."),
            message: trimmed.message.is_empty().then_some("Message is required."),
        };
        if errors.is_empty() { Ok(trimmed) } else { Err(errors) }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    /// Newest first.
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { sort: SortOrder::Asc, limit: DEFAULT_LIMIT, offset: 0 }
    }
}

// =============================================================================
// STORE
// =============================================================================

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<ContactMessage, MessageError>;
    async fn list(&self, query: ListQuery) -> Result<Vec<ContactMessage>, MessageError>;
    async fn count(&self) -> Result<usize, MessageError>;
    async fn delete(&self, id: u64) -> Result<(), MessageError>;
}

#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: u64,
    messages: BTreeMap<u64, ContactMessage>,
}

impl MemoryMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn create(&self, message: NewMessage) -> Result<ContactMessage, MessageError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let stored = ContactMessage {
            id: inner.next_id,
            name: message.name,
            email: message.email,
            message: message.message,
            created_at: Utc::now(),
        };
        inner.messages.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<ContactMessage>, MessageError> {
        let inner = self.inner.read().await;
        // Ids increase with creation time, so id order is age order.
        let ordered: Box<dyn Iterator<Item = &ContactMessage>> = match query.sort {
            SortOrder::Asc => Box::new(inner.messages.values()),
            SortOrder::Desc => Box::new(inner.messages.values().rev()),
        };
        Ok(ordered.skip(query.offset).take(query.limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, MessageError> {
        Ok(self.inner.read().await.messages.len())
    }

    async fn delete(&self, id: u64) -> Result<(), MessageError> {
        match self.inner.write().await.messages.remove(&id) {
            Some(_) => Ok(()),
            None => Err(MessageError::NotFound(id)),
        }
    }
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
