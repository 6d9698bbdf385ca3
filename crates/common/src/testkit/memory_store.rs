use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::content_provider::{ContentProvider, Entry, FileContent, Revision, StoreError};
use crate::credential_provider::CredentialStore;
use crate::testkit::MemoryCredentials;

/// In-memory content store with the same create/update conflict semantics
/// as the remote contents API. Optionally gated on a [`MemoryCredentials`]
/// slot so auth-gating behavior can be exercised.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
    gate: Option<MemoryCredentials>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    files: BTreeMap<String, StoredFile>,
    next_revision: u64,
}

#[derive(Debug, Clone)]
struct StoredFile {
    text: String,
    revision: Revision,
}

impl MemoryStore {
    /// Ungated store: every call is authorized.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner::default())),
            gate: None,
        }
    }

    /// Store that rejects every call with `AuthRequired` while the
    /// credential slot is empty.
    pub fn gated(credentials: MemoryCredentials) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner::default())),
            gate: Some(credentials),
        }
    }

    /// Write bypassing the revision check, as another client would.
    pub fn force_write(&self, path: &str, text: &str) -> Revision {
        let mut inner = self.inner.lock();
        let revision = inner.mint_revision();
        inner.files.insert(
            path.to_string(),
            StoredFile {
                text: text.to_string(),
                revision: revision.clone(),
            },
        );
        revision
    }

    pub fn revision_of(&self, path: &str) -> Option<Revision> {
        self.inner.lock().files.get(path).map(|f| f.revision.clone())
    }

    pub fn text_of(&self, path: &str) -> Option<String> {
        self.inner.lock().files.get(path).map(|f| f.text.clone())
    }

    pub fn file_count(&self) -> usize {
        self.inner.lock().files.len()
    }

    fn check_gate(&self) -> Result<(), StoreError> {
        match &self.gate {
            Some(credentials) if credentials.token().is_none() => Err(StoreError::AuthRequired),
            _ => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    fn mint_revision(&mut self) -> Revision {
        self.next_revision += 1;
        Revision::new(format!("rev-{}", self.next_revision))
    }
}

#[async_trait]
impl ContentProvider for MemoryStore {
    async fn list(&self, folder: &str) -> Result<Vec<Entry>, StoreError> {
        self.check_gate()?;
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        let inner = self.inner.lock();
        let entries: Vec<Entry> = inner
            .files
            .keys()
            .filter_map(|path| {
                let name = path.strip_prefix(&prefix)?;
                // direct children only
                if name.contains('/') {
                    return None;
                }
                Some(Entry {
                    path: path.clone(),
                    name: name.to_string(),
                    modified: None,
                })
            })
            .collect();
        if entries.is_empty() && !inner.files.keys().any(|p| p.starts_with(&prefix)) {
            return Err(StoreError::NotFound(folder.to_string()));
        }
        Ok(entries)
    }

    async fn read(&self, path: &str) -> Result<FileContent, StoreError> {
        self.check_gate()?;
        let inner = self.inner.lock();
        let file = inner
            .files
            .get(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(FileContent {
            text: file.text.clone(),
            revision: file.revision.clone(),
        })
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        _message: &str,
        revision: Option<&Revision>,
    ) -> Result<Revision, StoreError> {
        self.check_gate()?;
        let mut inner = self.inner.lock();
        match (inner.files.get(path).map(|f| f.revision.clone()), revision) {
            (Some(current), Some(supplied)) => {
                if current != *supplied {
                    return Err(StoreError::Conflict(format!(
                        "{} does not match {}",
                        supplied, current
                    )));
                }
            }
            (Some(_), None) => {
                return Err(StoreError::Conflict(format!("path already exists: {}", path)));
            }
            (None, Some(_)) => {
                return Err(StoreError::NotFound(path.to_string()));
            }
            (None, None) => {}
        }
        let new_revision = inner.mint_revision();
        inner.files.insert(
            path.to_string(),
            StoredFile {
                text: text.to_string(),
                revision: new_revision.clone(),
            },
        );
        Ok(new_revision)
    }
}
