use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use notary_core::{Credential, NotaryError};
use notary_logging::{notary_debug, notary_warn};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::decode::decode_product_error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Explicit path to the tool. When unset, `locator -f tool_name` resolves it.
    pub executable: Option<PathBuf>,
    pub locator: PathBuf,
    pub tool_name: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            executable: None,
            locator: PathBuf::from("/usr/bin/xcrun"),
            tool_name: "altool".to_string(),
        }
    }
}

/// What a finished subprocess left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Successful tool invocation. `stdout` is trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Raw subprocess seam. Every call is independent; implementations hold no
/// per-call state, so calls may overlap freely.
#[async_trait::async_trait]
pub trait ToolRunner: Send + Sync {
    async fn execute(&self, args: &[String]) -> Result<RawOutput, NotaryError>;
}

#[derive(Debug)]
pub struct ProcessRunner {
    settings: ToolSettings,
    resolved: OnceCell<PathBuf>,
}

impl ProcessRunner {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
            resolved: OnceCell::new(),
        }
    }

    /// Resolved tool path, located on first use.
    pub async fn executable_path(&self) -> Result<PathBuf, NotaryError> {
        self.resolved
            .get_or_try_init(|| self.locate())
            .await
            .cloned()
    }

    async fn locate(&self) -> Result<PathBuf, NotaryError> {
        if let Some(path) = &self.settings.executable {
            let is_file = tokio::fs::metadata(path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                return Ok(path.clone());
            }
            notary_warn!("Configured tool {:?} does not exist", path);
            return Err(NotaryError::ToolNotFound);
        }

        let output = Command::new(&self.settings.locator)
            .arg("-f")
            .arg(&self.settings.tool_name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                notary_warn!("Could not run {:?}: {}", self.settings.locator, err);
                NotaryError::ToolNotFound
            })?;
        if !output.status.success() {
            return Err(NotaryError::ToolNotFound);
        }

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(NotaryError::ToolNotFound);
        }
        notary_debug!("Located {} at {}", self.settings.tool_name, path);
        Ok(PathBuf::from(path))
    }
}

#[async_trait::async_trait]
impl ToolRunner for ProcessRunner {
    async fn execute(&self, args: &[String]) -> Result<RawOutput, NotaryError> {
        let executable = self.executable_path().await?;
        notary_debug!("Command {:?} {}", executable, redact_args(args));

        let output = Command::new(&executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => NotaryError::ToolNotFound,
                _ => NotaryError::Launch(err.to_string()),
            })?;

        notary_debug!("Command finished with {}", output.status);
        Ok(RawOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Tool operations this poller uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    History { page: u64 },
    Info { uuid: String },
    Help,
}

impl Operation {
    /// Full argument list. Authentication is appended to every operation except the help probe.
    pub fn arguments(&self, credential: Option<&Credential>) -> Vec<String> {
        let mut args = match self {
            Operation::History { page } => {
                vec!["--notarization-history".to_string(), page.to_string()]
            }
            Operation::Info { uuid } => vec!["--notarization-info".to_string(), uuid.clone()],
            Operation::Help => return vec!["--help".to_string()],
        };

        if let Some(credential) = credential {
            args.push("-u".to_string());
            args.push(credential.username.clone());
            args.push("-p".to_string());
            args.push(credential.password.clone());
            if let Some(name) = &credential.provider_short_name {
                args.push("--asc-provider".to_string());
                args.push(name.clone());
            }
        }

        args.push("--output-format".to_string());
        args.push("xml".to_string());
        args
    }
}

/// Argument list for logging, with the password replaced.
pub fn redact_args(args: &[String]) -> String {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push("<redacted>");
            hide_next = false;
            continue;
        }
        hide_next = arg == "-p";
        out.push(arg.as_str());
    }
    out.join(" ")
}

/// Adapter over the notarization command-line tool.
#[derive(Clone)]
pub struct Altool {
    runner: Arc<dyn ToolRunner>,
}

impl Altool {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        Self::new(Arc::new(ProcessRunner::new(settings)))
    }

    /// Any output on either stream in answer to `--help` means the tool works.
    pub async fn is_available(&self) -> bool {
        match self.runner.execute(&Operation::Help.arguments(None)).await {
            Ok(output) => !output.stdout.is_empty() || !output.stderr.is_empty(),
            Err(err) => {
                notary_debug!("Availability probe failed: {}", err);
                false
            }
        }
    }

    pub async fn run(
        &self,
        operation: &Operation,
        credential: &Credential,
    ) -> Result<ToolOutput, NotaryError> {
        let raw = self
            .runner
            .execute(&operation.arguments(Some(credential)))
            .await?;

        let (Ok(stdout), Ok(stderr)) = (String::from_utf8(raw.stdout), String::from_utf8(raw.stderr))
        else {
            return Err(NotaryError::NoData);
        };

        if let Some(error) = decode_product_error(&stdout) {
            return Err(error);
        }
        if !raw.success {
            notary_debug!("Tool failed without product-errors: {}", stderr.trim());
            return Err(NotaryError::NoData);
        }

        Ok(ToolOutput {
            stdout: stdout.trim().to_string(),
            stderr,
        })
    }

    pub async fn history_page(
        &self,
        credential: &Credential,
        page: u64,
    ) -> Result<String, NotaryError> {
        let output = self.run(&Operation::History { page }, credential).await?;
        Ok(output.stdout)
    }

    pub async fn info(&self, credential: &Credential, uuid: &str) -> Result<String, NotaryError> {
        let operation = Operation::Info {
            uuid: uuid.to_string(),
        };
        let output = self.run(&operation, credential).await?;
        Ok(output.stdout)
    }

    /// Validates a credential by fetching the first history page.
    pub async fn check_credential(&self, credential: &Credential) -> Result<(), NotaryError> {
        self.history_page(credential, 0).await.map(|_| ())
    }
}
