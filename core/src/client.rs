//! Stateless request builder and response parser for the GitHub REST API.
//!
//! # Design
//! `GitHubClient` holds only the shared account settings and carries no
//! mutable state between calls. Each remote operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! Reads accept any 2xx status. Issue creation only succeeds on 201; a 200
//! there means the remote did something other than create. No status is
//! special-cased, so a missing repository is an ordinary `RemoteRejected`.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::config::GitHubConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{IssueRequest, IssueResponse, ProfileBundle, Repository, UserProfile};

/// Media type pinning the v3 REST API.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// The remote API rejects requests without a user agent.
pub const USER_AGENT: &str = "gh-proxy";

/// Fixed page size for the repository listing.
pub const REPOSITORIES_PER_PAGE: u32 = 100;

const STATUS_CREATED: u16 = 201;

/// Everything but RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Synchronous, stateless client for the remote API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    config: Arc<GitHubConfig>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: Arc<GitHubConfig>) -> Self {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        Self { config, base_url }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    pub fn build_get_user(&self) -> HttpRequest {
        self.get(format!("/users/{}", encode_segment(&self.config.account)))
    }

    pub fn build_list_repositories(&self) -> HttpRequest {
        self.get(format!(
            "/users/{}/repos?type=owner&sort=updated&per_page={REPOSITORIES_PER_PAGE}",
            encode_segment(&self.config.account)
        ))
    }

    pub fn build_get_repository(&self, name: &str) -> HttpRequest {
        self.get(format!(
            "/repos/{}/{}",
            encode_segment(&self.config.account),
            encode_segment(name)
        ))
    }

    pub fn build_create_issue(&self, repo: &str, issue: &IssueRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(issue).map_err(|e| ApiError::EncodeFailed(e.to_string()))?;
        let mut request = self.request(
            HttpMethod::Post,
            format!(
                "/repos/{}/{}/issues",
                encode_segment(&self.config.account),
                encode_segment(repo)
            ),
        );
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<UserProfile, ApiError> {
        check_success(&response)?;
        decode(&response)
    }

    pub fn parse_repositories(&self, response: HttpResponse) -> Result<Vec<Repository>, ApiError> {
        check_success(&response)?;
        decode(&response)
    }

    pub fn parse_repository(&self, response: HttpResponse) -> Result<Repository, ApiError> {
        check_success(&response)?;
        decode(&response)
    }

    pub fn parse_create_issue(&self, response: HttpResponse) -> Result<IssueResponse, ApiError> {
        if response.status != STATUS_CREATED {
            return Err(rejected(response));
        }
        decode(&response)
    }

    pub fn assemble_profile(&self, user: UserProfile, repositories: Vec<Repository>) -> ProfileBundle {
        ProfileBundle { user, repositories }
    }

    fn get(&self, path: String) -> HttpRequest {
        self.request(HttpMethod::Get, path)
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.config.token)),
                ("accept".to_string(), ACCEPT_MEDIA_TYPE.to_string()),
                ("user-agent".to_string(), USER_AGENT.to_string()),
            ],
            body: None,
        }
    }
}

/// Map any non-2xx status to `RemoteRejected`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RemoteRejected {
        status: response.status,
        body: response.body.clone(),
    })
}

fn rejected(response: HttpResponse) -> ApiError {
    ApiError::RemoteRejected {
        status: response.status,
        body: response.body,
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DecodeFailed(e.to_string()))
}

/// Percent-encode a single path segment. Unreserved characters pass through.
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
