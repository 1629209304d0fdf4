use crate::{AccountId, Generation, NotaryError, Trigger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the paginator for `account`.
    FetchHistory {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
    },
    /// Look up log URLs for the listed submissions.
    FetchDetails {
        account: AccountId,
        generation: Generation,
        uuids: Vec<String>,
    },
    /// Ask the user for the account's password.
    PromptCredential { account: AccountId },
    /// Blocking notification for a failed user-initiated refresh.
    ReportError {
        account: AccountId,
        error: NotaryError,
    },
}
