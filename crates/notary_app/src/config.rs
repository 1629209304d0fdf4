use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notary_core::Credential;
use notary_engine::{CredentialProvider, PollSettings, ToolSettings};
use notary_logging::{notary_info, notary_warn, LogSettings};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "notary.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{0} must be at least one second")]
    Interval(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    #[serde(default)]
    pub provider_short_name: Option<String>,
    /// Environment variable holding the password. Without one the password is
    /// asked for on the first manual refresh.
    #[serde(default)]
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub accounts: Vec<AccountConfig>,
    pub refresh_interval_secs: u64,
    pub enrich_interval_secs: u64,
    pub tool: ToolSettings,
    pub poll: PollSettings,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            refresh_interval_secs: 5,
            enrich_interval_secs: 5,
            tool: ToolSettings::default(),
            poll: PollSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Interval("refresh_interval_secs"));
        }
        if self.enrich_interval_secs == 0 {
            return Err(ConfigError::Interval("enrich_interval_secs"));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn enrich_interval(&self) -> Duration {
        Duration::from_secs(self.enrich_interval_secs)
    }

    pub fn account(&self, username: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Credential for `username` with the configured provider short name.
    pub fn credential(&self, username: &str, password: String) -> Credential {
        let mut credential = Credential::new(username, password);
        credential.provider_short_name = self
            .account(username)
            .and_then(|account| account.provider_short_name.clone());
        credential
    }

    /// Stores every password that is available from the environment.
    pub fn register_credentials(&self, provider: &dyn CredentialProvider) -> usize {
        let mut registered = 0;
        for account in &self.accounts {
            let Some(var) = &account.password_env else {
                continue;
            };
            match std::env::var(var) {
                Ok(password) if !password.is_empty() => {
                    provider.store(self.credential(&account.username, password));
                    registered += 1;
                }
                Ok(_) | Err(_) => {
                    notary_warn!("{} is not set; {} will be prompted", var, account.username);
                }
            }
        }
        notary_info!("Registered {} credential(s) from the environment", registered);
        registered
    }
}

/// Resolves the config path: explicit flag, then the default file name.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
