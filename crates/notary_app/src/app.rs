use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use notary_core::{update, AccountId, AppState, Msg, NotaryError};
use notary_engine::{Altool, CredentialProvider, EngineHandle, SessionCredentials};
use notary_logging::{notary_debug, notary_info, notary_warn};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::input::{parse_command, Command, HELP};
use crate::render::render;

/// Everything the owner loop reacts to, funnelled through one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppInput {
    Core(Msg),
    Line(String),
    CredentialRejected {
        account: AccountId,
        error: NotaryError,
    },
    InputClosed,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run_app(config: AppConfig, initial_account: Option<AccountId>) -> anyhow::Result<()> {
    let credentials = Arc::new(SessionCredentials::new());
    config.register_credentials(credentials.as_ref());

    let tool = Altool::with_settings(config.tool.clone());
    let engine = EngineHandle::new(tool, config.poll.clone(), credentials.clone())
        .context("failed to start the poll engine")?;

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(engine, input_tx.clone());
    runner.engine().probe_tool();

    spawn_timer("notary-refresh", input_tx.clone(), config.refresh_interval(), || {
        Msg::RefreshTimer
    })?;
    spawn_timer("notary-enrich", input_tx.clone(), config.enrich_interval(), || {
        Msg::EnrichTimer
    })?;
    spawn_stdin_reader(input_tx)?;

    let mut app = App {
        state: AppState::new(),
        config,
        runner,
        credentials,
    };

    println!("{}", HELP);
    let first = initial_account.or_else(|| {
        app.config
            .accounts
            .first()
            .map(|account| account.username.clone())
    });
    match first {
        Some(account) => app.dispatch(Msg::AccountSelected(account)),
        None => notary_warn!("No account configured; use `a <user>` to add one"),
    }

    while let Ok(input) = input_rx.recv() {
        if let Flow::Quit = app.handle(input) {
            break;
        }
    }
    notary_info!("Notary poller stopped");
    Ok(())
}

struct App {
    state: AppState,
    config: AppConfig,
    runner: EffectRunner,
    credentials: Arc<SessionCredentials>,
}

impl App {
    fn handle(&mut self, input: AppInput) -> Flow {
        match input {
            AppInput::Core(msg) => self.dispatch(msg),
            AppInput::Line(line) => return self.handle_line(line),
            AppInput::CredentialRejected { account, error } => {
                eprintln!("Password for {} rejected: {}", account, error);
                if let Some(suggestion) = error.suggestion() {
                    eprintln!("  {}", suggestion);
                }
                self.runner.prompt(account);
            }
            AppInput::InputClosed => return Flow::Quit,
        }
        Flow::Continue
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            for line in render(&state.view()) {
                println!("{}", line);
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn handle_line(&mut self, line: String) -> Flow {
        if let Some(account) = self.runner.take_pending_prompt() {
            let password = line.trim_end_matches(['\r', '\n']);
            if password.is_empty() {
                println!("Password entry for {} cancelled", account);
            } else {
                let credential = self.config.credential(&account, password.to_string());
                self.runner.engine().check_credential(credential);
            }
            return Flow::Continue;
        }

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Refresh)) => self.dispatch(Msg::RefreshRequested),
            Ok(Some(Command::Select(account))) => self.dispatch(Msg::AccountSelected(account)),
            Ok(Some(Command::Deselect)) => self.dispatch(Msg::AccountDeselected),
            Ok(Some(Command::Remove(account))) => {
                self.credentials.forget(&account);
                self.runner.cancel_prompt_for(&account);
                self.dispatch(Msg::AccountRemoved(account));
            }
            Ok(Some(Command::Help)) => println!("{}", HELP),
            Ok(Some(Command::Quit)) => return Flow::Quit,
            Err(err) => {
                eprintln!("{}", err);
                println!("{}", HELP);
            }
        }
        Flow::Continue
    }
}

fn spawn_timer(
    name: &str,
    input_tx: mpsc::Sender<AppInput>,
    interval: Duration,
    make_msg: fn() -> Msg,
) -> anyhow::Result<()> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            if input_tx.send(AppInput::Core(make_msg())).is_err() {
                break;
            }
        })
        .with_context(|| format!("failed to start {} thread", name))?;
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) -> anyhow::Result<()> {
    thread::Builder::new()
        .name("notary-stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if input_tx.send(AppInput::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        notary_warn!("Failed to read stdin: {}", err);
                        break;
                    }
                }
            }
            notary_debug!("stdin closed");
            let _ = input_tx.send(AppInput::InputClosed);
        })
        .context("failed to start stdin reader")?;
    Ok(())
}
