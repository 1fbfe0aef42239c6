//! Handler failures and their HTTP rendering.
//!
//! Remote failures collapse to 500 with a fixed message per operation. The
//! underlying `ApiError` is logged by the handler and never rendered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gh_proxy_core::ErrorResponse;
use thiserror::Error;

pub const REPO_NAME_REQUIRED: &str = "Repository name is required";
pub const INVALID_REPO_NAME: &str = "Invalid repository name";
pub const INVALID_ISSUE: &str = "Invalid request: title and body are required";
pub const PROFILE_FAILED: &str = "Failed to retrieve GitHub profile";
pub const REPOSITORY_FAILED: &str = "Failed to retrieve repository information";
pub const ISSUE_FAILED: &str = "Failed to create issue";

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Bad client input; the remote API is never called.
    #[error("{0}")]
    Validation(&'static str),

    /// The remote call failed; carries the public message only.
    #[error("{0}")]
    Remote(&'static str),

    /// A handler panicked.
    #[error("Internal server error")]
    Internal,

    #[error("Not found")]
    NotFound,
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::Remote(_) | HandlerError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
