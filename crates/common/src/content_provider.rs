use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Opaque revision handle supplied by the content store. Required to update
/// an existing path, absent when creating a new one. The store, not the
/// client, decides whether a revision is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listing entry. `modified` is backend-dependent: the local directory
/// backend reports file mtimes, the remote contents API has none.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: String,
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
}

/// A file read from the store, decoded from the transport encoding.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub text: String,
    pub revision: Revision,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("authentication required")]
    AuthRequired,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("remote error: {0}")]
    Remote(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for any store that can list, read and write posts by path.
///
/// Implementations classify failures into the [`StoreError`] taxonomy:
/// 401/403-equivalent outcomes as `AuthRequired` (and no write may reach
/// the backend without a credential), 404 as `NotFound`, stale-revision or
/// existing-path writes as `Conflict`, anything else as `Remote` carrying
/// the provider's message verbatim.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// List the entries directly under `folder`. Ordering is the caller's
    /// responsibility.
    async fn list(&self, folder: &str) -> Result<Vec<Entry>, StoreError>;

    /// Read the file at `path`, decoded to text.
    async fn read(&self, path: &str) -> Result<FileContent, StoreError>;

    /// Write `text` to `path`. With `revision` this is an optimistic
    /// update, rejected with `Conflict` when the store holds a different
    /// revision; without it, a create, rejected with `Conflict` when the
    /// path already exists. `message` is the change description recorded
    /// alongside the write.
    async fn write(
        &self,
        path: &str,
        text: &str,
        message: &str,
        revision: Option<&Revision>,
    ) -> Result<Revision, StoreError>;
}
