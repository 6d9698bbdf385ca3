use std::sync::Arc;

use base64::Engine;

use async_trait::async_trait;
use common::prelude::{
    ContentProvider, Credential, CredentialStore, Entry, FileContent, Revision, StoreError,
};

use super::client::{ApiError, GithubClient};

/// [`ContentProvider`] over the GitHub contents API for one fixed
/// repository + branch. The credential is read from the injected store on
/// every call; with no credential present, no request leaves the process.
pub struct GithubStore {
    client: GithubClient,
    repo: String,
    branch: String,
    credentials: Arc<dyn CredentialStore>,
}

impl GithubStore {
    pub fn new(
        client: GithubClient,
        repo: impl Into<String>,
        branch: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            client,
            repo: repo.into(),
            branch: branch.into(),
            credentials,
        }
    }

    fn require_credential(&self) -> Result<Credential, StoreError> {
        self.credentials.token().ok_or(StoreError::AuthRequired)
    }
}

#[async_trait]
impl ContentProvider for GithubStore {
    async fn list(&self, folder: &str) -> Result<Vec<Entry>, StoreError> {
        let credential = self.require_credential()?;
        let entries = self
            .client
            .list_contents(&credential, &self.repo, folder, &self.branch)
            .await
            .map_err(classify)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.entry_type == "file")
            .map(|e| Entry {
                path: e.path,
                name: e.name,
                // the contents API carries no modification time
                modified: None,
            })
            .collect())
    }

    async fn read(&self, path: &str) -> Result<FileContent, StoreError> {
        let credential = self.require_credential()?;
        let file = self
            .client
            .get_contents(&credential, &self.repo, path, &self.branch)
            .await
            .map_err(classify)?;
        Ok(FileContent {
            text: decode_content(&file.content)?,
            revision: Revision::new(file.sha),
        })
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        message: &str,
        revision: Option<&Revision>,
    ) -> Result<Revision, StoreError> {
        let credential = self.require_credential()?;
        let content_b64 = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        let sha = self
            .client
            .put_contents(
                &credential,
                &self.repo,
                path,
                &self.branch,
                message,
                &content_b64,
                revision.map(Revision::as_str),
            )
            .await
            .map_err(classify)?;
        tracing::debug!(path = %path, message = %message, "wrote contents");
        Ok(Revision::new(sha))
    }
}

/// Map a transport failure onto the store taxonomy: 401/403 demand
/// re-authentication, 404 is a missing path, 409/422 are the store's
/// optimistic-concurrency rejections (stale revision or existing path),
/// anything else carries the provider's message verbatim.
fn classify(err: ApiError) -> StoreError {
    match err {
        ApiError::HttpStatus(status, body) => {
            let message = extract_message(&body);
            match status.as_u16() {
                401 | 403 => StoreError::AuthRequired,
                404 => StoreError::NotFound(message),
                409 | 422 => StoreError::Conflict(message),
                _ => StoreError::Remote(message),
            }
        }
        other => StoreError::Remote(other.to_string()),
    }
}

/// Non-2xx bodies are JSON `{"message": …}`; fall back to the raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

/// The transport base64 arrives chunked with embedded newlines.
fn decode_content(raw: &str) -> Result<String, StoreError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Remote(format!("invalid base64 content: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Remote(format!("content is not UTF-8: {}", e)))
}
