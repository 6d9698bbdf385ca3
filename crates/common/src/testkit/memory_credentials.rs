use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::credential_provider::{Credential, CredentialError, CredentialStore};

/// In-memory credential slot with a fixed owner identity and a table of
/// accepted tokens, standing in for the remote identity endpoint.
#[derive(Debug, Clone)]
pub struct MemoryCredentials {
    inner: Arc<Mutex<MemoryCredentialsInner>>,
}

#[derive(Debug)]
struct MemoryCredentialsInner {
    owner: String,
    slot: Option<Credential>,
    /// token -> login the "identity endpoint" resolves it to
    accepted: HashMap<String, String>,
}

impl MemoryCredentials {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryCredentialsInner {
                owner: owner.into(),
                slot: None,
                accepted: HashMap::new(),
            })),
        }
    }

    /// Register a token the identity check will resolve to `login`.
    pub fn accept(&self, token: impl Into<String>, login: impl Into<String>) {
        self.inner.lock().accepted.insert(token.into(), login.into());
    }

    /// Make a previously accepted token stop resolving, as an expired or
    /// revoked token would.
    pub fn revoke(&self, token: &str) {
        self.inner.lock().accepted.remove(token);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<Credential> {
        self.inner.lock().slot.clone()
    }

    fn store(&self, credential: &Credential) -> Result<(), CredentialError> {
        self.inner.lock().slot = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.inner.lock().slot = None;
        Ok(())
    }

    async fn verify(&self) -> Result<Option<String>, CredentialError> {
        let mut inner = self.inner.lock();
        let resolved = inner
            .slot
            .as_ref()
            .and_then(|c| inner.accepted.get(c.reveal()).cloned());
        match resolved {
            Some(login) if login == inner.owner => Ok(Some(login)),
            // Unknown token or wrong identity: drop the credential so it is
            // never retried.
            _ => {
                inner.slot = None;
                Ok(None)
            }
        }
    }
}
