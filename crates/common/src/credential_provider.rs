use async_trait::async_trait;

/// An opaque bearer token. Never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building an `Authorization` header.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The single persisted credential slot plus its validation lifecycle.
///
/// `store` and `clear` are the only mutators of the slot, and a mutation is
/// visible to every subsequent `token` call immediately. `verify` resolves
/// the token against the backend's identity endpoint and compares it to the
/// one configured owner; on mismatch or check failure the slot is cleared
/// and `None` returned, so a bad credential is never retried silently.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<Credential>;

    fn store(&self, credential: &Credential) -> Result<(), CredentialError>;

    /// Idempotent.
    fn clear(&self) -> Result<(), CredentialError>;

    /// Returns the owner identity when the persisted token checks out,
    /// `None` (with the slot cleared) otherwise.
    async fn verify(&self) -> Result<Option<String>, CredentialError>;
}
