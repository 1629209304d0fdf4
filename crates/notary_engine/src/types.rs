use notary_core::{AccountId, Generation, HistoryItem, NotaryError, Trigger};

use crate::enrich::Enrichment;

/// Results handed back from the worker to the owner of the poll state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ToolProbed {
        available: bool,
    },
    /// A history fetch was requested for an account without a credential.
    /// No subprocess was started.
    CredentialMissing {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
    },
    /// Outcome of a credential check. On success the credential has been stored.
    CredentialChecked {
        account: AccountId,
        result: Result<(), NotaryError>,
    },
    HistoryFetched {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
        result: Result<Vec<HistoryItem>, NotaryError>,
    },
    DetailsFetched {
        account: AccountId,
        generation: Generation,
        enrichment: Enrichment,
    },
}
