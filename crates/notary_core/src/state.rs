use std::collections::BTreeMap;

use crate::view_model::{AccountView, AppViewModel, HistoryRowView};
use crate::{AccountId, Generation, ItemStore, Trigger};

/// Per-account poll state. Only the owner of [`AppState`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollState {
    generation: Generation,
    items: ItemStore,
    refreshing: bool,
    enriching: bool,
    loading: bool,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_generation(generation: Generation) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut ItemStore {
        &mut self.items
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_enriching(&self) -> bool {
        self.enriching
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Enters `Refreshing`. Returns false when a refresh is already in flight.
    pub(crate) fn begin_refresh(&mut self, trigger: Trigger) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        if trigger.is_user() {
            self.loading = true;
        }
        true
    }

    pub(crate) fn finish_refresh(&mut self, trigger: Trigger) {
        self.refreshing = false;
        if trigger.is_user() {
            self.loading = false;
        }
    }

    /// Enters `Enriching`. Returns false when enrichment is already in flight.
    pub(crate) fn begin_enrich(&mut self) -> bool {
        if self.enriching {
            return false;
        }
        self.enriching = true;
        true
    }

    pub(crate) fn finish_enrich(&mut self) {
        self.enriching = false;
    }
}

/// Everything the owner context holds: one [`PollState`] per known account and
/// the account currently attached to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    accounts: BTreeMap<AccountId, PollState>,
    active: Option<AccountId>,
    tool_available: Option<bool>,
    next_generation: Generation,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_account(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn account(&self, account: &str) -> Option<&PollState> {
        self.accounts.get(account)
    }

    pub fn tool_available(&self) -> Option<bool> {
        self.tool_available
    }

    pub fn view(&self) -> AppViewModel {
        let active = self.active.as_ref().and_then(|account| {
            self.accounts.get(account).map(|poll| AccountView {
                account: account.clone(),
                rows: poll
                    .items()
                    .newest_first()
                    .into_iter()
                    .map(HistoryRowView::from)
                    .collect(),
                loading: poll.is_loading(),
                refreshing: poll.is_refreshing(),
                enriching: poll.is_enriching(),
            })
        });
        AppViewModel {
            accounts: self.accounts.keys().cloned().collect(),
            tool_available: self.tool_available,
            active,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn poll_mut(&mut self, account: &str) -> Option<&mut PollState> {
        self.accounts.get_mut(account)
    }

    /// The account's state, provided it is still the incarnation `generation`
    /// was issued for.
    pub(crate) fn poll_for(
        &mut self,
        account: &str,
        generation: Generation,
    ) -> Option<&mut PollState> {
        self.accounts
            .get_mut(account)
            .filter(|poll| poll.generation == generation)
    }

    pub(crate) fn active_poll_mut(&mut self) -> Option<(AccountId, &mut PollState)> {
        let account = self.active.clone()?;
        let poll = self.accounts.get_mut(&account)?;
        Some((account, poll))
    }

    /// Makes `account` live. Returns true when its state was created by this call.
    pub(crate) fn activate(&mut self, account: AccountId) -> bool {
        let created = !self.accounts.contains_key(&account);
        if created {
            let poll = PollState::with_generation(self.next_generation);
            self.next_generation += 1;
            self.accounts.insert(account.clone(), poll);
        }
        self.active = Some(account);
        created
    }

    pub(crate) fn deactivate(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub(crate) fn remove(&mut self, account: &str) -> bool {
        if self.active.as_deref() == Some(account) {
            self.active = None;
        }
        self.accounts.remove(account).is_some()
    }

    pub(crate) fn set_tool_available(&mut self, available: bool) {
        self.tool_available = Some(available);
    }
}
