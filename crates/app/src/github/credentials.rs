use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use common::prelude::{Credential, CredentialError, CredentialStore};

use super::client::GithubClient;

/// The persisted credential slot: a single token file in the app
/// directory, validated against `GET /user` and cleared the moment the
/// token stops resolving to the configured owner.
pub struct TokenFile {
    path: PathBuf,
    expected_login: String,
    client: GithubClient,
}

impl TokenFile {
    pub fn new(path: PathBuf, expected_login: impl Into<String>, client: GithubClient) -> Self {
        Self {
            path,
            expected_login: expected_login.into(),
            client,
        }
    }
}

#[async_trait]
impl CredentialStore for TokenFile {
    fn token(&self) -> Option<Credential> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(Credential::new(token))
    }

    fn store(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, credential.reveal())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn verify(&self) -> Result<Option<String>, CredentialError> {
        let Some(credential) = self.token() else {
            return Ok(None);
        };
        match self.client.current_user(&credential).await {
            Ok(login) if login == self.expected_login => Ok(Some(login)),
            Ok(login) => {
                tracing::warn!(login = %login, "token resolves to a different identity, clearing");
                self.clear()?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("identity check failed: {}, clearing token", e);
                self.clear()?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use url::Url;

    fn token_file(dir: &TempDir) -> TokenFile {
        let client = GithubClient::new(&Url::parse("https://api.github.com").unwrap()).unwrap();
        TokenFile::new(dir.path().join("token"), "pythontogo", client)
    }

    #[test]
    fn empty_slot_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(token_file(&dir).token().is_none());
    }

    #[test]
    fn store_then_token_round_trips() {
        let dir = TempDir::new().unwrap();
        let slot = token_file(&dir);
        slot.store(&Credential::new("ghp_abc123")).unwrap();
        assert_eq!(slot.token().unwrap().reveal(), "ghp_abc123");
    }

    #[test]
    fn whitespace_only_slot_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let slot = token_file(&dir);
        fs::write(dir.path().join("token"), "\n  \n").unwrap();
        assert!(slot.token().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let slot = token_file(&dir);
        slot.store(&Credential::new("ghp_abc123")).unwrap();
        slot.clear().unwrap();
        slot.clear().unwrap();
        assert!(slot.token().is_none());
    }
}
