//! Data model shared by the remote API and the proxy's own JSON surface.
//!
//! # Design
//! Field names follow the remote API so a payload decoded from upstream can be
//! re-serialized to the proxy's caller unchanged. Unknown upstream fields are
//! ignored. Every value lives for a single request.

use serde::{Deserialize, Deserializer, Serialize};

/// The account's user resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    /// Display name. Accounts without one come back as `null` upstream.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    pub followers: u64,
    pub following: u64,
}

/// A repository owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// User plus repositories, most recently updated first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBundle {
    pub user: UserProfile,
    pub repositories: Vec<Repository>,
}

/// Inbound payload for `POST /github/{repo}/issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    pub title: String,
    pub body: String,
}

impl IssueRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Both fields must contain something other than whitespace. The error
    /// names the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.body.trim().is_empty() {
            return Err("body is required");
        }
        Ok(())
    }
}

/// The created issue as reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResponse {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

/// Uniform error envelope: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
