use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use notary_core::{AccountId, Effect, Msg, NotaryError};
use notary_engine::{EngineEvent, EngineHandle};
use notary_logging::{notary_debug, notary_error, notary_info};

use crate::app::AppInput;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Accounts waiting for a password, answered in request order.
#[derive(Debug, Default)]
pub struct PromptQueue {
    waiting: VecDeque<AccountId>,
}

impl PromptQueue {
    /// Queues `account` unless it is already waiting. Returns true when it is
    /// the prompt the next input line answers.
    pub fn push(&mut self, account: AccountId) -> bool {
        if self.waiting.contains(&account) {
            return false;
        }
        if let Some(current) = self.waiting.front() {
            notary_info!("Password prompt for {} queued behind {}", account, current);
        }
        self.waiting.push_back(account);
        self.waiting.len() == 1
    }

    pub fn current(&self) -> Option<&str> {
        self.waiting.front().map(String::as_str)
    }

    pub fn answer(&mut self) -> Option<AccountId> {
        self.waiting.pop_front()
    }

    /// Drops `account` from the queue. Returns true when it was the current prompt.
    pub fn cancel(&mut self, account: &str) -> bool {
        let was_current = self.current() == Some(account);
        self.waiting.retain(|waiting| waiting != account);
        was_current
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }
}

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    prompts: PromptQueue,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, input_tx: mpsc::Sender<AppInput>) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
            prompts: PromptQueue::default(),
        };
        runner.spawn_event_loop(input_tx);
        runner
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchHistory {
                    account,
                    generation,
                    trigger,
                } => {
                    notary_debug!("FetchHistory account={} trigger={:?}", account, trigger);
                    self.engine.fetch_history(account, generation, trigger);
                }
                Effect::FetchDetails {
                    account,
                    generation,
                    uuids,
                } => {
                    notary_debug!("FetchDetails account={} count={}", account, uuids.len());
                    self.engine.fetch_details(account, generation, uuids);
                }
                Effect::PromptCredential { account } => self.prompt(account),
                Effect::ReportError { account, error } => report_error(&account, &error),
            }
        }
    }

    pub fn prompt(&mut self, account: AccountId) {
        if self.prompts.push(account.clone()) {
            announce_prompt(&account);
        } else if self.prompts.current() != Some(account.as_str()) {
            println!(
                "Password for {} will be asked after the current prompt ({} waiting)",
                account,
                self.prompts.waiting()
            );
        }
    }

    /// Account whose password the next input line answers, if any.
    pub fn take_pending_prompt(&mut self) -> Option<AccountId> {
        let answered = self.prompts.answer()?;
        if let Some(next) = self.prompts.current() {
            announce_prompt(next);
        }
        Some(answered)
    }

    pub fn cancel_prompt_for(&mut self, account: &str) {
        if self.prompts.cancel(account) {
            if let Some(next) = self.prompts.current() {
                announce_prompt(next);
            }
        }
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<AppInput>) {
        let engine = self.engine.clone();
        let spawned = thread::Builder::new()
            .name("notary-events".to_string())
            .spawn(move || loop {
                if let Some(event) = engine.recv_timeout(EVENT_POLL) {
                    if input_tx.send(map_event(event)).is_err() {
                        break;
                    }
                }
            });
        if let Err(err) = spawned {
            notary_error!("Failed to start engine event pump: {}", err);
        }
    }
}

fn announce_prompt(account: &str) {
    println!("Password for {} (blank line cancels):", account);
}

pub fn report_error(account: &str, error: &NotaryError) {
    notary_error!("Refresh for {} failed: {}", account, error);
    eprintln!("Refresh for {} failed: {}", account, error);
    if let Some(suggestion) = error.suggestion() {
        eprintln!("  {}", suggestion);
    }
}

pub fn map_event(event: EngineEvent) -> AppInput {
    match event {
        EngineEvent::ToolProbed { available } => AppInput::Core(Msg::ToolProbed { available }),
        EngineEvent::CredentialMissing {
            account,
            generation,
            trigger,
        } => AppInput::Core(Msg::CredentialMissing {
            account,
            generation,
            trigger,
        }),
        EngineEvent::CredentialChecked { account, result } => match result {
            Ok(()) => AppInput::Core(Msg::CredentialProvided(account)),
            Err(error) => AppInput::CredentialRejected { account, error },
        },
        EngineEvent::HistoryFetched {
            account,
            generation,
            trigger,
            result,
        } => {
            if let Ok(items) = &result {
                notary_debug!("History for {}: {} item(s)", account, items.len());
            }
            AppInput::Core(Msg::HistoryFetched {
                account,
                generation,
                trigger,
                result,
            })
        }
        EngineEvent::DetailsFetched {
            account,
            generation,
            enrichment,
        } => {
            if !enrichment.failures.is_empty() {
                notary_info!(
                    "{} detail lookup(s) for {} will be retried",
                    enrichment.failures.len(),
                    account
                );
            }
            AppInput::Core(Msg::DetailsFetched {
                account,
                generation,
                details: enrichment.details,
            })
        }
    }
}
