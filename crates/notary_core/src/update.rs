use notary_logging::{notary_debug, notary_info, notary_warn};

use crate::{AppState, Effect, Generation, HistoryItem, ItemDetail, Msg, NotaryError, Trigger};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AccountSelected(account) => {
            let created = state.activate(account.clone());
            state.mark_dirty();
            if created {
                // A fresh account loads its history straight away, with the loading state shown.
                refresh(&mut state, &account, Trigger::User)
            } else {
                Vec::new()
            }
        }
        Msg::AccountDeselected => {
            if state.deactivate() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AccountRemoved(account) => {
            if state.remove(&account) {
                notary_info!("Dropped poll state for {}", account);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RefreshRequested => refresh_active(&mut state, Trigger::User),
        Msg::RefreshTimer => refresh_active(&mut state, Trigger::Background),
        Msg::EnrichTimer => enrich_active(&mut state),
        Msg::CredentialMissing {
            account,
            generation,
            trigger,
        } => credential_missing(&mut state, account, generation, trigger),
        Msg::CredentialProvided(account) => refresh(&mut state, &account, Trigger::User),
        Msg::HistoryFetched {
            account,
            generation,
            trigger,
            result,
        } => apply_history(&mut state, account, generation, trigger, result),
        Msg::DetailsFetched {
            account,
            generation,
            details,
        } => {
            apply_details(&mut state, &account, generation, details);
            Vec::new()
        }
        Msg::ToolProbed { available } => {
            if !available {
                notary_warn!("Notarization tool is not available");
            }
            state.set_tool_available(available);
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn refresh_active(state: &mut AppState, trigger: Trigger) -> Vec<Effect> {
    match state.active_account().map(ToOwned::to_owned) {
        Some(account) => refresh(state, &account, trigger),
        None => Vec::new(),
    }
}

fn refresh(state: &mut AppState, account: &str, trigger: Trigger) -> Vec<Effect> {
    let Some(poll) = state.poll_mut(account) else {
        return Vec::new();
    };
    if !poll.begin_refresh(trigger) {
        notary_debug!("Refresh for {} already in flight ({:?} ignored)", account, trigger);
        return Vec::new();
    }
    let generation = poll.generation();
    if trigger.is_user() {
        state.mark_dirty();
    }
    vec![Effect::FetchHistory {
        account: account.to_owned(),
        generation,
        trigger,
    }]
}

fn enrich_active(state: &mut AppState) -> Vec<Effect> {
    let Some((account, poll)) = state.active_poll_mut() else {
        return Vec::new();
    };
    if poll.is_enriching() {
        notary_debug!("Enrichment for {} already in flight", account);
        return Vec::new();
    }
    let uuids = poll.items().missing_details();
    if uuids.is_empty() {
        return Vec::new();
    }
    poll.begin_enrich();
    let generation = poll.generation();
    state.mark_dirty();
    vec![Effect::FetchDetails {
        account,
        generation,
        uuids,
    }]
}

fn credential_missing(
    state: &mut AppState,
    account: String,
    generation: Generation,
    trigger: Trigger,
) -> Vec<Effect> {
    let Some(poll) = state.poll_for(&account, generation) else {
        notary_debug!("Ignoring stale credential notice for {}", account);
        return Vec::new();
    };
    poll.finish_refresh(trigger);
    state.mark_dirty();
    if trigger.is_user() {
        vec![Effect::PromptCredential { account }]
    } else {
        notary_debug!("No credential for {}; background refresh abandoned", account);
        Vec::new()
    }
}

fn apply_history(
    state: &mut AppState,
    account: String,
    generation: Generation,
    trigger: Trigger,
    result: Result<Vec<HistoryItem>, NotaryError>,
) -> Vec<Effect> {
    let Some(poll) = state.poll_for(&account, generation) else {
        notary_debug!("Ignoring history for {} (generation {})", account, generation);
        return Vec::new();
    };
    poll.finish_refresh(trigger);

    let effects = match result {
        Ok(items) => {
            let fetched = items.len();
            let stats = poll.items_mut().merge(items);
            notary_info!(
                "History for {}: fetched={} inserted={} retained={}",
                account,
                fetched,
                stats.inserted,
                stats.retained
            );
            Vec::new()
        }
        Err(error) if error.is_decode() => {
            notary_warn!("History for {} unreadable, no items this cycle: {}", account, error);
            Vec::new()
        }
        Err(error) if trigger.is_user() => {
            notary_warn!("Refresh for {} failed: {}", account, error);
            vec![Effect::ReportError { account, error }]
        }
        Err(error) => {
            notary_warn!("Background refresh for {} failed: {}", account, error);
            Vec::new()
        }
    };
    state.mark_dirty();
    effects
}

fn apply_details(
    state: &mut AppState,
    account: &str,
    generation: Generation,
    details: Vec<ItemDetail>,
) {
    let Some(poll) = state.poll_for(account, generation) else {
        notary_debug!("Ignoring details for {} (generation {})", account, generation);
        return;
    };
    poll.finish_enrich();
    let applied = poll.items_mut().apply_details(details);
    notary_debug!("Details for {}: applied={}", account, applied);
    state.mark_dirty();
}
