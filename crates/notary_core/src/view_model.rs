use chrono::{DateTime, Utc};

use crate::{AccountId, HistoryItem};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Known accounts, sorted by username.
    pub accounts: Vec<AccountId>,
    /// `None` until the availability probe has answered.
    pub tool_available: Option<bool>,
    pub active: Option<AccountView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub account: AccountId,
    /// Newest submission first.
    pub rows: Vec<HistoryRowView>,
    pub loading: bool,
    pub refreshing: bool,
    pub enriching: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub uuid: String,
    pub submitted_at: DateTime<Utc>,
    pub success: bool,
    pub status_code: i64,
    pub status_message: String,
    pub detail_url: Option<String>,
}

impl From<&HistoryItem> for HistoryRowView {
    fn from(item: &HistoryItem) -> Self {
        Self {
            uuid: item.uuid.clone(),
            submitted_at: item.submitted_at,
            success: item.success,
            status_code: item.status_code,
            status_message: item.status_message.clone(),
            detail_url: item.detail_url.clone(),
        }
    }
}
