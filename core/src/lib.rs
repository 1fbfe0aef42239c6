//! I/O-free client core for the GitHub account proxy.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The server crate executes the
//! actual round-trip, so request construction, status mapping and decoding
//! are fully deterministic here.
//!
//! # Design
//! - `GitHubClient` holds only a shared, immutable `GitHubConfig`.
//! - Each remote operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - The same types are used for decoding remote payloads and for the JSON
//!   the proxy returns, so field names mirror the remote API.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::GitHubClient;
pub use config::{GitHubConfig, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ErrorResponse, IssueRequest, IssueResponse, ProfileBundle, Repository, UserProfile};
