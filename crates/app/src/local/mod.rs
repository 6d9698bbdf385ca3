//! Local-directory backend: the same list/read/write surface as the remote
//! store, against files under a root directory. Revisions are sha-256
//! content hashes, so the optimistic-concurrency semantics match.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use common::prelude::{
    ContentProvider, Credential, CredentialError, CredentialStore, Entry, FileContent, Revision,
    StoreError,
};

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join `path` under the root, rejecting anything that could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(StoreError::Remote(format!("access denied: {}", path)));
        }
        Ok(self.root.join(rel))
    }
}

fn content_revision(text: &str) -> Revision {
    let digest = Sha256::digest(text.as_bytes());
    Revision::new(format!("{:x}", digest))
}

fn map_io(err: std::io::Error, path: &str) -> StoreError {
    if err.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound(path.to_string())
    } else {
        StoreError::Other(err.into())
    }
}

#[async_trait]
impl ContentProvider for LocalStore {
    async fn list(&self, folder: &str) -> Result<Vec<Entry>, StoreError> {
        let dir = self.resolve(folder)?;
        if !dir.is_dir() {
            return Err(StoreError::NotFound(folder.to_string()));
        }
        let mut entries = Vec::new();
        for item in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let item = item.map_err(|e| StoreError::Other(e.into()))?;
            if !item.file_type().is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().to_string();
            let modified = item
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);
            entries.push(Entry {
                path: format!("{}/{}", folder.trim_end_matches('/'), name),
                name,
                modified,
            });
        }
        Ok(entries)
    }

    async fn read(&self, path: &str) -> Result<FileContent, StoreError> {
        let file = self.resolve(path)?;
        let text = std::fs::read_to_string(&file).map_err(|e| map_io(e, path))?;
        let revision = content_revision(&text);
        Ok(FileContent { text, revision })
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        message: &str,
        revision: Option<&Revision>,
    ) -> Result<Revision, StoreError> {
        let file = self.resolve(path)?;
        let current = match std::fs::read_to_string(&file) {
            Ok(existing) => Some(content_revision(&existing)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::Other(e.into())),
        };
        match (current, revision) {
            (Some(current), Some(supplied)) => {
                if current != *supplied {
                    return Err(StoreError::Conflict(format!(
                        "{} does not match {}",
                        supplied, current
                    )));
                }
            }
            (Some(_), None) => {
                return Err(StoreError::Conflict(format!(
                    "path already exists: {}",
                    path
                )));
            }
            (None, Some(_)) => return Err(StoreError::NotFound(path.to_string())),
            (None, None) => {}
        }
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Other(e.into()))?;
        }
        std::fs::write(&file, text).map_err(|e| map_io(e, path))?;
        // the change description has nowhere to go in a bare directory
        tracing::debug!(path = %path, message = %message, "wrote local file");
        Ok(content_revision(text))
    }
}

/// Always-valid credential store for the local backend: there is no remote
/// identity to check, so the OS user stands in.
pub struct LocalIdentity;

#[async_trait]
impl CredentialStore for LocalIdentity {
    fn token(&self) -> Option<Credential> {
        Some(Credential::new("local"))
    }

    fn store(&self, _credential: &Credential) -> Result<(), CredentialError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        Ok(())
    }

    async fn verify(&self) -> Result<Option<String>, CredentialError> {
        Ok(Some(whoami::username()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (LocalStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (LocalStore::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn write_read_round_trip() {
        let (store, _dir) = store();
        let rev = store
            .write("_posts/2024-03-01-a.md", "text", "Create post: a", None)
            .await
            .unwrap();
        let file = store.read("_posts/2024-03-01-a.md").await.unwrap();
        assert_eq!(file.text, "text");
        assert_eq!(file.revision, rev);
    }

    #[tokio::test]
    async fn read_is_idempotent() {
        let (store, _dir) = store();
        store
            .write("_posts/a.md", "text", "Create post: a", None)
            .await
            .unwrap();
        let first = store.read("_posts/a.md").await.unwrap();
        let second = store.read("_posts/a.md").await.unwrap();
        assert_eq!(first.revision, second.revision);
    }

    #[tokio::test]
    async fn traversal_is_rejected_without_touching_disk() {
        let (store, dir) = store();
        for path in ["../outside.md", "/etc/passwd", "_posts/../../outside.md"] {
            let result = store.write(path, "x", "Create post: x", None).await;
            assert!(matches!(result, Err(StoreError::Remote(_))), "{}", path);
        }
        assert!(!dir.path().parent().unwrap().join("outside.md").exists());
    }

    #[tokio::test]
    async fn stale_revision_conflicts() {
        let (store, _dir) = store();
        let stale = store
            .write("_posts/a.md", "v1", "Create post: a", None)
            .await
            .unwrap();
        store
            .write("_posts/a.md", "v2", "Update post: a", Some(&stale))
            .await
            .unwrap();
        let result = store
            .write("_posts/a.md", "v3", "Update post: a", Some(&stale))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.read("_posts/a.md").await.unwrap().text, "v2");
    }

    #[tokio::test]
    async fn create_over_existing_path_conflicts() {
        let (store, _dir) = store();
        store
            .write("_posts/a.md", "v1", "Create post: a", None)
            .await
            .unwrap();
        let result = store.write("_posts/a.md", "v2", "Create post: a", None).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_of_missing_path_is_not_found() {
        let (store, _dir) = store();
        let rev = Revision::new("0".repeat(64));
        let result = store
            .write("_posts/missing.md", "x", "Update post: x", Some(&rev))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_reports_files_with_mtimes() {
        let (store, _dir) = store();
        store
            .write("_posts/2024-03-01-a.md", "a", "Create post: a", None)
            .await
            .unwrap();
        store
            .write("_posts/2024-04-01-b.md", "b", "Create post: b", None)
            .await
            .unwrap();
        // nested files are not direct children
        store
            .write("_posts/drafts/c.md", "c", "Create post: c", None)
            .await
            .unwrap();

        let mut entries = store.list("_posts").await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["2024-03-01-a.md", "2024-04-01-b.md"]);
        assert!(entries.iter().all(|e| e.modified.is_some()));
    }

    #[tokio::test]
    async fn missing_folder_is_not_found() {
        let (store, _dir) = store();
        assert!(matches!(
            store.list("_posts").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn local_identity_is_always_valid() {
        let identity = LocalIdentity;
        assert!(identity.token().is_some());
        assert!(identity.verify().await.unwrap().is_some());
    }
}
