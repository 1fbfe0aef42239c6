//! Remote API capability and its reqwest-backed implementation.
//!
//! Handlers only see `dyn GitHubApi`; `RemoteGitHub` executes the requests
//! built by `gh_proxy_core::GitHubClient` and hands the raw responses back to
//! it for status mapping and decoding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gh_proxy_core::{
    ApiError, GitHubClient, GitHubConfig, HttpMethod, HttpRequest, HttpResponse, IssueRequest, IssueResponse,
    ProfileBundle, Repository,
};
use tracing::{debug, error, instrument};

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The three operations the proxy exposes.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// The account's user resource plus its most recently updated repositories.
    async fn fetch_profile(&self) -> Result<ProfileBundle, ApiError>;

    async fn fetch_repository(&self, name: &str) -> Result<Repository, ApiError>;

    async fn create_issue(&self, repo: &str, issue: &IssueRequest) -> Result<IssueResponse, ApiError>;
}

/// Talks to the real remote API over HTTPS.
#[derive(Debug, Clone)]
pub struct RemoteGitHub {
    client: GitHubClient,
    http: reqwest::Client,
}

impl RemoteGitHub {
    pub fn new(config: Arc<GitHubConfig>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: GitHubClient::new(config),
            http,
        })
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = req.method.as_str(), url = %req.url, "calling remote API");

        let mut builder = match req.method {
            HttpMethod::Get => self.http.get(&req.url),
            HttpMethod::Post => self.http.post(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl GitHubApi for RemoteGitHub {
    #[instrument(skip(self))]
    async fn fetch_profile(&self) -> Result<ProfileBundle, ApiError> {
        let response = self.execute(self.client.build_get_user()).await?;
        let user = self.client.parse_user(response).inspect_err(log_failure)?;

        let response = self.execute(self.client.build_list_repositories()).await?;
        let repositories = self.client.parse_repositories(response).inspect_err(log_failure)?;
        debug!(repositories = repositories.len(), "fetched profile");

        Ok(self.client.assemble_profile(user, repositories))
    }

    #[instrument(skip(self))]
    async fn fetch_repository(&self, name: &str) -> Result<Repository, ApiError> {
        let response = self.execute(self.client.build_get_repository(name)).await?;
        self.client.parse_repository(response).inspect_err(log_failure)
    }

    #[instrument(skip(self, issue), fields(title = %issue.title))]
    async fn create_issue(&self, repo: &str, issue: &IssueRequest) -> Result<IssueResponse, ApiError> {
        let request = self.client.build_create_issue(repo, issue)?;
        let response = self.execute(request).await?;
        self.client.parse_create_issue(response).inspect_err(log_failure)
    }
}

fn log_failure(err: &ApiError) {
    match err {
        ApiError::RemoteRejected { status, body } => {
            error!(status_code = status, response = %body, "GitHub API error");
        }
        other => error!(error = %other, "GitHub API response could not be used"),
    }
}
