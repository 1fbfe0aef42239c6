//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests to the remote API are described as plain data. `GitHubClient`
//! builds `HttpRequest` values and parses `HttpResponse` values without ever
//! opening a socket; the server crate owns the transport and executes the
//! round-trip. This keeps status mapping and decoding deterministic and
//! testable without a network.

/// HTTP method for a remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A remote API request described as plain data.
///
/// `url` is absolute, including any query string. Header names are
/// lowercase.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A remote API response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `GitHubClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
