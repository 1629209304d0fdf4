use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use notary_core::{AccountId, Credential, Generation, Trigger};
use notary_logging::{notary_debug, notary_info};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialProvider;
use crate::enrich::{enrich, Enrichment};
use crate::history::fetch_all_history;
use crate::tool::Altool;
use crate::EngineEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Upper bound on history pages fetched in one cycle.
    pub max_pages: usize,
    /// Concurrent `--notarization-info` calls per enrichment cycle.
    pub max_concurrent_info: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_pages: 256,
            max_concurrent_info: 8,
        }
    }
}

enum EngineCommand {
    ProbeTool,
    CheckCredential {
        credential: Credential,
    },
    FetchHistory {
        account: AccountId,
        generation: Generation,
        trigger: Trigger,
        credential: Credential,
    },
    FetchDetails {
        account: AccountId,
        generation: Generation,
        credential: Credential,
        uuids: Vec<String>,
    },
}

/// Worker front: commands go in, [`EngineEvent`]s come out.
///
/// Every command runs as its own task on a runtime owned by the worker thread,
/// so separate accounts never wait on each other.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    credentials: Arc<dyn CredentialProvider>,
}

impl EngineHandle {
    pub fn new(
        tool: Altool,
        settings: PollSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("notary-engine")
            .build()?;

        let worker_tx = event_tx.clone();
        let worker_credentials = credentials.clone();
        let settings = Arc::new(settings);
        thread::Builder::new()
            .name("notary-engine-commands".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let tool = tool.clone();
                    let settings = settings.clone();
                    let event_tx = worker_tx.clone();
                    let credentials = worker_credentials.clone();
                    runtime.spawn(async move {
                        handle_command(&tool, &settings, credentials.as_ref(), command, event_tx)
                            .await;
                    });
                }
                notary_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx: Mutex::new(event_rx),
            credentials,
        })
    }

    pub fn probe_tool(&self) {
        self.send(EngineCommand::ProbeTool);
    }

    /// Validates `credential` against the tool and stores it on success.
    pub fn check_credential(&self, credential: Credential) {
        self.send(EngineCommand::CheckCredential { credential });
    }

    /// Runs a pagination cycle. `generation` is echoed back in the resulting event.
    pub fn fetch_history(
        &self,
        account: impl Into<AccountId>,
        generation: Generation,
        trigger: Trigger,
    ) {
        let account = account.into();
        match self.credentials.credential(&account) {
            Some(credential) => self.send(EngineCommand::FetchHistory {
                account,
                generation,
                trigger,
                credential,
            }),
            None => {
                let _ = self.event_tx.send(EngineEvent::CredentialMissing {
                    account,
                    generation,
                    trigger,
                });
            }
        }
    }

    pub fn fetch_details(
        &self,
        account: impl Into<AccountId>,
        generation: Generation,
        uuids: Vec<String>,
    ) {
        let account = account.into();
        match self.credentials.credential(&account) {
            Some(credential) => self.send(EngineCommand::FetchDetails {
                account,
                generation,
                credential,
                uuids,
            }),
            None => {
                notary_debug!("No credential for {}; enrichment skipped", account);
                let _ = self.event_tx.send(EngineEvent::DetailsFetched {
                    account,
                    generation,
                    enrichment: Enrichment::default(),
                });
            }
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(
    tool: &Altool,
    settings: &PollSettings,
    credentials: &dyn CredentialProvider,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ProbeTool => EngineEvent::ToolProbed {
            available: tool.is_available().await,
        },
        EngineCommand::CheckCredential { credential } => {
            let account = credential.username.clone();
            let result = tool.check_credential(&credential).await;
            if result.is_ok() {
                notary_info!("Credential for {} accepted", account);
                credentials.store(credential);
            }
            EngineEvent::CredentialChecked { account, result }
        }
        EngineCommand::FetchHistory {
            account,
            generation,
            trigger,
            credential,
        } => {
            notary_debug!("History cycle for {} ({:?})", account, trigger);
            let result = fetch_all_history(tool, &credential, settings).await;
            EngineEvent::HistoryFetched {
                account,
                generation,
                trigger,
                result,
            }
        }
        EngineCommand::FetchDetails {
            account,
            generation,
            credential,
            uuids,
        } => {
            notary_debug!("Enrichment cycle for {}: {} items", account, uuids.len());
            let enrichment = enrich(tool, &credential, uuids, settings).await;
            EngineEvent::DetailsFetched {
                account,
                generation,
                enrichment,
            }
        }
    };
    let _ = event_tx.send(event);
}
