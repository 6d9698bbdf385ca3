use std::sync::Arc;

use parking_lot::Mutex;

use crate::content_provider::{ContentProvider, Entry, Revision, StoreError};
use crate::credential_provider::{Credential, CredentialError, CredentialStore};
use crate::post::front_matter::{self, FrontMatterError};
use crate::post::{post_path, Post};

/// Identity of the document currently being edited. The path is pinned on
/// the first save and reused for every update afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub path: String,
    pub revision: Revision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated {
        identity: String,
        /// `None` means "new, unsaved document".
        open: Option<OpenDocument>,
    },
}

/// The result of a successful save.
#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub path: String,
    pub revision: Revision,
    /// True when this save created the document.
    pub created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication required")]
    AuthRequired,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("parse error: {0}")]
    Parse(#[from] FrontMatterError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AuthRequired => SessionError::AuthRequired,
            other => SessionError::Store(other),
        }
    }
}

/// Orchestrates the credential store, content provider and front-matter
/// codec: authenticate, list, open, save-as-create-or-update.
///
/// Cheaply cloneable; clones share the same state. The state mutex is never
/// held across an await: every remote call works on a snapshot and state is
/// written back only after the call succeeds, so a failed operation leaves
/// the session exactly where it was.
#[derive(Clone)]
pub struct EditorSession {
    state: Arc<Mutex<SessionState>>,
    // Serializes saves so two saves can never race the same stale revision.
    save_gate: Arc<tokio::sync::Mutex<()>>,
    store: Arc<dyn ContentProvider>,
    credentials: Arc<dyn CredentialStore>,
    posts_dir: String,
}

impl EditorSession {
    pub fn new(
        store: Arc<dyn ContentProvider>,
        credentials: Arc<dyn CredentialStore>,
        posts_dir: impl Into<String>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::Unauthenticated)),
            save_gate: Arc::new(tokio::sync::Mutex::new(())),
            store,
            credentials,
            posts_dir: posts_dir.into(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn identity(&self) -> Option<String> {
        match &*self.state.lock() {
            SessionState::Authenticated { identity, .. } => Some(identity.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn open_document(&self) -> Option<OpenDocument> {
        match &*self.state.lock() {
            SessionState::Authenticated { open, .. } => open.clone(),
            SessionState::Unauthenticated => None,
        }
    }

    /// Persist a freshly supplied credential and validate it. On success the
    /// session becomes `Authenticated` with no open document; on failure the
    /// credential slot has already been cleared by the store.
    pub async fn login(&self, credential: Credential) -> Result<String, SessionError> {
        self.credentials.store(&credential)?;
        match self.credentials.verify().await? {
            Some(identity) => {
                tracing::info!(identity = %identity, "logged in");
                *self.state.lock() = SessionState::Authenticated {
                    identity: identity.clone(),
                    open: None,
                };
                Ok(identity)
            }
            None => {
                *self.state.lock() = SessionState::Unauthenticated;
                Err(SessionError::AuthRequired)
            }
        }
    }

    /// Re-validate the persisted credential at the start of a logical
    /// session. Keeps the open document when the same identity checks out
    /// again; drops to `Unauthenticated` otherwise.
    pub async fn authenticate(&self) -> Result<String, SessionError> {
        match self.credentials.verify().await? {
            Some(identity) => {
                let mut state = self.state.lock();
                match &mut *state {
                    SessionState::Authenticated {
                        identity: current, ..
                    } if *current == identity => {}
                    _ => {
                        *state = SessionState::Authenticated {
                            identity: identity.clone(),
                            open: None,
                        };
                    }
                }
                Ok(identity)
            }
            None => {
                *self.state.lock() = SessionState::Unauthenticated;
                Err(SessionError::AuthRequired)
            }
        }
    }

    /// Clear the credential and discard the open document. Idempotent.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.credentials.clear()?;
        *self.state.lock() = SessionState::Unauthenticated;
        tracing::info!("logged out");
        Ok(())
    }

    /// List the Markdown documents in the configured posts folder. Ordering
    /// is left to the caller.
    pub async fn list(&self) -> Result<Vec<Entry>, SessionError> {
        self.require_auth()?;
        let entries = self.store.list(&self.posts_dir).await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.name.ends_with(".md"))
            .collect())
    }

    /// Load and parse the document at `path`. On success it becomes the open
    /// document; a parse failure surfaces without touching session state, so
    /// a malformed stored post can never half-populate the editor.
    pub async fn open(&self, path: &str) -> Result<Post, SessionError> {
        self.require_auth()?;
        let file = self.store.read(path).await?;
        let post = front_matter::deserialize(&file.text)?;
        let mut state = self.state.lock();
        if let SessionState::Authenticated { open, .. } = &mut *state {
            *open = Some(OpenDocument {
                path: path.to_string(),
                revision: file.revision,
            });
        }
        tracing::debug!(path = %path, "opened document");
        Ok(post)
    }

    /// Start a new, unsaved document. The next save will create.
    pub fn new_document(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        match &mut *state {
            SessionState::Authenticated { open, .. } => {
                *open = None;
                Ok(())
            }
            SessionState::Unauthenticated => Err(SessionError::AuthRequired),
        }
    }

    /// Save the post: create when no document is open, update otherwise.
    ///
    /// Saves are serialized through an internal async mutex; a second save
    /// issued while one is in flight queues behind it. For an update the
    /// current remote revision is re-fetched immediately before the write,
    /// which narrows but does not close the read-modify-write race; the
    /// store's own revision check is what makes the race safe, surfacing as
    /// `Conflict` with no state change, no merge and no retry.
    pub async fn save(&self, post: &Post) -> Result<SavedDocument, SessionError> {
        let _guard = self.save_gate.lock().await;
        self.require_auth()?;

        if post.title.trim().is_empty() {
            return Err(SessionError::Validation("title must not be empty".into()));
        }

        let open = self.open_document();
        let text = front_matter::serialize(post);

        let saved = match open {
            Some(doc) => {
                let fresh = self.store.read(&doc.path).await?;
                let message = format!("Update post: {}", post.title);
                let revision = self
                    .store
                    .write(&doc.path, &text, &message, Some(&fresh.revision))
                    .await?;
                SavedDocument {
                    path: doc.path,
                    revision,
                    created: false,
                }
            }
            None => {
                let path = post_path(&self.posts_dir, post.date, &post.title);
                let message = format!("Create post: {}", post.title);
                let revision = self.store.write(&path, &text, &message, None).await?;
                SavedDocument {
                    path,
                    revision,
                    created: true,
                }
            }
        };

        let mut state = self.state.lock();
        if let SessionState::Authenticated { open, .. } = &mut *state {
            *open = Some(OpenDocument {
                path: saved.path.clone(),
                revision: saved.revision.clone(),
            });
        }
        tracing::info!(path = %saved.path, created = saved.created, "saved document");
        Ok(saved)
    }

    fn require_auth(&self) -> Result<String, SessionError> {
        match &*self.state.lock() {
            SessionState::Authenticated { identity, .. } => Ok(identity.clone()),
            SessionState::Unauthenticated => Err(SessionError::AuthRequired),
        }
    }
}
