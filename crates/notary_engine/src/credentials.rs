use std::collections::HashMap;
use std::sync::RwLock;

use notary_core::Credential;

/// Source of account credentials. Owned by the caller and handed to the engine.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self, account: &str) -> Option<Credential>;
    fn store(&self, credential: Credential);
    fn forget(&self, account: &str);
}

/// Credentials kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SessionCredentials {
    entries: RwLock<HashMap<String, Credential>>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialProvider for SessionCredentials {
    fn credential(&self, account: &str) -> Option<Credential> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(account).cloned())
    }

    fn store(&self, credential: Credential) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(credential.username.clone(), credential);
        }
    }

    fn forget(&self, account: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(account);
        }
    }
}
