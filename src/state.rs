//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Content is loaded before the state is built and never changes; the
//! message and session stores are trait objects so the backend can be
//! swapped without touching handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::blog::BlogService;
use crate::services::messages::{MemoryMessageStore, MessageStore};
use crate::services::policy::Policy;
use crate::services::presentations::PresentationService;
use crate::services::resume::ResumeDoc;
use crate::services::session::{CurrentUser, MemorySessionStore, SessionStore};
use crate::services::ContentError;

// =============================================================================
// CONTENT
// =============================================================================

/// Every document the site serves, loaded once at startup.
#[derive(Debug, Default)]
pub struct Content {
    pub blog: BlogService,
    pub presentations: PresentationService,
    pub resume: ResumeDoc,
}

impl Content {
    /// Load `blog/`, `presentations/` and `resume.yaml` under `root`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContentError`] encountered.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        Ok(Self {
            blog: BlogService::load(&root.join("blog"))?,
            presentations: PresentationService::load(&root.join("presentations"))?,
            resume: ResumeDoc::load(&root.join("resume.yaml"))?,
        })
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub presentations: Arc<PresentationService>,
    pub resume: Arc<ResumeDoc>,
    pub messages: Arc<dyn MessageStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub policy: Arc<Policy>,
    /// URL prefix for static assets, e.g. `/static/0.1.0`.
    pub static_prefix: Arc<str>,
    pub static_dir: Arc<PathBuf>,
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: &AppConfig,
        content: Content,
        messages: Arc<dyn MessageStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            blog: Arc::new(content.blog),
            presentations: Arc::new(content.presentations),
            resume: Arc::new(content.resume),
            messages,
            sessions,
            policy: Arc::new(Policy::new(config.admin_logins.iter().cloned())),
            static_prefix: config.static_prefix().into(),
            static_dir: Arc::new(config.static_dir.clone()),
            cookie_secure: config.cookie_secure,
        }
    }

    /// State backed by the in-memory stores, with the configured admin
    /// sessions already signed in.
    #[must_use]
    pub fn in_memory(config: &AppConfig, content: Content) -> Self {
        let sessions = config.admin_sessions.iter().map(|(session, login)| {
            let user = CurrentUser { login: login.clone(), name: None, avatar_url: None };
            (session.clone(), user)
        });
        let sessions = MemorySessionStore::seeded(sessions);
        Self::new(config, content, Arc::new(MemoryMessageStore::new()), Arc::new(sessions))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
