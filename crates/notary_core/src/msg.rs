use crate::{AccountId, Generation, HistoryItem, ItemDetail, NotaryError, Trigger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an account; it becomes the live one.
    AccountSelected(AccountId),
    /// No account is shown any more. Its state is kept.
    AccountDeselected,
    /// Account deleted; its state is dropped.
    AccountRemoved(AccountId),
    /// User asked for a refresh of the active account.
    RefreshRequested,
    /// Periodic history trigger.
    RefreshTimer,
    /// Periodic detail-enrichment trigger.
    EnrichTimer,
    /// No credential was available when a history fetch was about to start.
    CredentialMissing {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
    },
    /// The credential prompt for `account` was answered.
    CredentialProvided(AccountId),
    /// Engine finished a pagination cycle. Ignored unless `generation`
    /// matches the account's live state.
    HistoryFetched {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
        result: Result<Vec<HistoryItem>, NotaryError>,
    },
    /// Engine finished an enrichment cycle. Only successful lookups are listed.
    DetailsFetched {
        account: AccountId,
        generation: Generation,
        details: Vec<ItemDetail>,
    },
    /// Answer of the tool availability probe.
    ToolProbed { available: bool },
}
