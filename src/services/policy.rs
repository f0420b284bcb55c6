//! Access policy for protected routes.

use std::collections::HashSet;

/// Allow-list of logins with full access. Everyone else is denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    admins: HashSet<String>,
}

impl Policy {
    pub fn new(admins: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { admins: admins.into_iter().map(Into::into).collect() }
    }

    /// Whether `login` may issue `method` against `path`.
    #[must_use]
    pub fn enforce(&self, login: &str, path: &str, method: &str) -> bool {
        let allowed = self.admins.contains(login);
        tracing::debug!(login, path, method, allowed, "policy decision");
        allowed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
