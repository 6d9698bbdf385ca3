use reqwest::{header::HeaderMap, header::HeaderValue, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::Credential;

const ACCEPT: &str = "application/vnd.github.v3+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("inkwell/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

/// A file fetched from `GET /repos/{repo}/contents/{path}`. `content` is
/// base64 in the transport, with newlines the provider inserts every 60
/// characters.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsFile {
    pub content: String,
    pub sha: String,
}

/// One entry of a `GET /repos/{repo}/contents/{folder}` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

#[derive(Debug, Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentsContent,
}

#[derive(Debug, Deserialize)]
struct PutContentsContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

/// Thin client over the contents + identity endpoints of the GitHub REST
/// API. Pure transport: the bearer credential is supplied per call and the
/// repository/branch context lives in [`super::GithubStore`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base: Url,
    client: Client,
}

impl GithubClient {
    pub fn new(api_base: &Url) -> Result<Self, ApiError> {
        let mut api_base = api_base.clone();
        // joins below are relative, so the base path must end with a slash
        if !api_base.path().ends_with('/') {
            api_base.set_path(&format!("{}/", api_base.path()));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert("Accept", HeaderValue::from_static(ACCEPT));
        default_headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()?;

        Ok(Self { api_base, client })
    }

    /// Resolve the credential to a login via `GET /user`.
    pub async fn current_user(&self, credential: &Credential) -> Result<String, ApiError> {
        let url = self.api_base.join("user")?;
        let user: UserResponse = self
            .call(self.client.get(url).bearer_auth(credential.reveal()))
            .await?;
        Ok(user.login)
    }

    /// Fetch a single file with its revision.
    pub async fn get_contents(
        &self,
        credential: &Credential,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<ContentsFile, ApiError> {
        let url = self.contents_url(repo, path)?;
        self.call(
            self.client
                .get(url)
                .query(&[("ref", branch)])
                .bearer_auth(credential.reveal()),
        )
        .await
    }

    /// List the entries under a folder.
    pub async fn list_contents(
        &self,
        credential: &Credential,
        repo: &str,
        folder: &str,
        branch: &str,
    ) -> Result<Vec<ContentsEntry>, ApiError> {
        let url = self.contents_url(repo, folder)?;
        self.call(
            self.client
                .get(url)
                .query(&[("ref", branch)])
                .bearer_auth(credential.reveal()),
        )
        .await
    }

    /// Create or update a file. `sha` present makes this an update the
    /// store rejects when its current revision differs; absent, a create
    /// the store rejects when the path already exists.
    #[allow(clippy::too_many_arguments)]
    pub async fn put_contents(
        &self,
        credential: &Credential,
        repo: &str,
        path: &str,
        branch: &str,
        message: &str,
        content_b64: &str,
        sha: Option<&str>,
    ) -> Result<String, ApiError> {
        let url = self.contents_url(repo, path)?;
        let body = PutContentsBody {
            message,
            content: content_b64,
            branch,
            sha,
        };
        let response: PutContentsResponse = self
            .call(
                self.client
                    .put(url)
                    .json(&body)
                    .bearer_auth(credential.reveal()),
            )
            .await?;
        Ok(response.content.sha)
    }

    fn contents_url(&self, repo: &str, path: &str) -> Result<Url, ApiError> {
        Ok(self
            .api_base
            .join(&format!("repos/{}/contents/{}", repo, path))?)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let client = GithubClient::new(&Url::parse("https://api.github.com").unwrap()).unwrap();
        let url = client
            .contents_url("owner/repo", "_posts/2024-03-01-hello.md")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/owner/repo/contents/_posts/2024-03-01-hello.md"
        );
    }

    #[test]
    fn enterprise_base_path_is_preserved() {
        let client =
            GithubClient::new(&Url::parse("https://ghe.example.com/api/v3").unwrap()).unwrap();
        let url = client.contents_url("owner/repo", "_posts").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/owner/repo/contents/_posts"
        );
    }

    #[test]
    fn put_body_omits_absent_sha() {
        let body = PutContentsBody {
            message: "Create post: x",
            content: "YQ==",
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["branch"], "main");
    }
}
