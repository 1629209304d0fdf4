use std::fmt;

use chrono::{DateTime, Utc};

/// Accounts are keyed by their notarization username.
pub type AccountId = String;

/// Tells apart successive poll states of the same account. A state created
/// after a removal never shares the generation of the one it replaces.
pub type Generation = u64;

/// Login used for every tool invocation. Supplied by a credential provider and
/// never persisted by the poller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub provider_short_name: Option<String>,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            provider_short_name: None,
        }
    }

    pub fn with_provider(mut self, provider_short_name: impl Into<String>) -> Self {
        self.provider_short_name = Some(provider_short_name.into());
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("provider_short_name", &self.provider_short_name)
            .finish()
    }
}

/// One notarization submission as reported by the history listing.
///
/// Identity is the `uuid`; the remaining fields are whatever the tool said the
/// first time the submission was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub uuid: String,
    pub submitted_at: DateTime<Utc>,
    pub success: bool,
    pub status_code: i64,
    pub status_message: String,
    pub detail_url: Option<String>,
}

impl HistoryItem {
    pub fn has_detail(&self) -> bool {
        self.detail_url.is_some()
    }
}

/// Log URL obtained for a single submission by the enricher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub uuid: String,
    pub detail_url: String,
}

/// Origin of a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Manual refresh: shows the loading state and surfaces failures.
    User,
    /// Periodic refresh: silent.
    Background,
}

impl Trigger {
    pub fn is_user(self) -> bool {
        self == Trigger::User
    }
}
