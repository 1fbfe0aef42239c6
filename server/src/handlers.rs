//! Request handlers: validate, delegate to `GitHubApi`, render.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use gh_proxy_core::{IssueRequest, IssueResponse, ProfileBundle, Repository};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::{
    HandlerError, INVALID_ISSUE, INVALID_REPO_NAME, ISSUE_FAILED, PROFILE_FAILED, REPOSITORY_FAILED, REPO_NAME_REQUIRED,
};
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /github`
pub async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileBundle>, HandlerError> {
    let profile = state.github.fetch_profile().await.map_err(|err| {
        error!(error = %err, "failed to get user profile");
        HandlerError::Remote(PROFILE_FAILED)
    })?;
    Ok(Json(profile))
}

/// `GET /github/{repo}`
pub async fn get_repository(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Repository>, HandlerError> {
    let repo = decoded_repo_name(path)?;
    let repo = required_repo_name(&repo)?;
    let repository = state.github.fetch_repository(repo).await.map_err(|err| {
        error!(error = %err, repo, "failed to get repository");
        HandlerError::Remote(REPOSITORY_FAILED)
    })?;
    Ok(Json(repository))
}

/// `POST /github/{repo}/issues`
pub async fn create_issue(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueResponse>), HandlerError> {
    let repo = decoded_repo_name(path)?;
    let repo = required_repo_name(&repo)?;
    let issue = match payload {
        Ok(Json(issue)) => match issue.validate() {
            Ok(()) => issue,
            Err(reason) => {
                warn!(reason, "rejected issue payload");
                return Err(HandlerError::Validation(INVALID_ISSUE));
            }
        },
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected issue payload");
            return Err(HandlerError::Validation(INVALID_ISSUE));
        }
    };

    let created = state.github.create_issue(repo, &issue).await.map_err(|err| {
        error!(error = %err, repo, "failed to create issue");
        HandlerError::Remote(ISSUE_FAILED)
    })?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Answers routes whose repository segment is empty (`/github/`, `/github//issues`).
pub async fn missing_repo_name() -> HandlerError {
    HandlerError::Validation(REPO_NAME_REQUIRED)
}

pub async fn not_found() -> HandlerError {
    HandlerError::NotFound
}

/// A segment that does not percent-decode to UTF-8 is rendered like any other
/// validation failure.
fn decoded_repo_name(path: Result<Path<String>, PathRejection>) -> Result<String, HandlerError> {
    match path {
        Ok(Path(repo)) => Ok(repo),
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected repository path");
            Err(HandlerError::Validation(INVALID_REPO_NAME))
        }
    }
}

fn required_repo_name(repo: &str) -> Result<&str, HandlerError> {
    if repo.trim().is_empty() {
        return Err(HandlerError::Validation(REPO_NAME_REQUIRED));
    }
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_repo_names_are_rejected() {
        assert!(required_repo_name("").is_err());
        assert!(required_repo_name("  ").is_err());
        assert_eq!(required_repo_name("hello-world").unwrap(), "hello-world");
    }
}
