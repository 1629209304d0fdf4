use notary_core::{update, AppState, Msg, Trigger};

#[test]
fn results_for_unknown_account_change_nothing() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::HistoryFetched {
            account: "ghost".to_string(),
            generation: 0,
            trigger: Trigger::User,
            result: Ok(Vec::new()),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn timers_without_active_account_do_nothing() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::RefreshTimer);
    assert!(effects.is_empty());
    let (next, effects) = update(next, Msg::EnrichTimer);
    assert!(effects.is_empty());
    let (next, effects) = update(next, Msg::RefreshRequested);
    assert!(effects.is_empty());
    assert_eq!(state, next);
}
