//! `RemoteGitHub` against a stub upstream bound to a random local port.
//!
//! The stub records every request it receives so the tests can assert on the
//! exact number and order of remote calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use gh_proxy_core::{ApiError, GitHubConfig, IssueRequest};
use gh_proxy_server::{app, AppState, GitHubApi, RemoteGitHub};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

#[derive(Clone)]
struct Stub {
    user_status: StatusCode,
    issue_status: StatusCode,
    repos_body: &'static str,
    hits: Arc<Mutex<Vec<Hit>>>,
}

#[derive(Debug, Clone)]
struct Hit {
    uri: String,
    authorization: Option<String>,
    accept: Option<String>,
    body: Option<Value>,
}

impl Stub {
    fn new() -> Self {
        Self {
            user_status: StatusCode::OK,
            issue_status: StatusCode::CREATED,
            repos_body: r#"[{"name":"newest","full_name":"octocat/newest"},{"name":"older","full_name":"octocat/older","description":"d"}]"#,
            hits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
        self.hits.lock().unwrap().push(Hit {
            uri: uri.to_string(),
            authorization: header("authorization"),
            accept: header("accept"),
            body,
        });
    }

    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }
}

async fn user(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
    stub.record(&uri, &headers, None);
    if stub.user_status != StatusCode::OK {
        return (stub.user_status, r#"{"message":"Not Found"}"#.to_string());
    }
    (
        StatusCode::OK,
        r#"{"login":"octocat","name":"The Octocat","followers":5,"following":1}"#.to_string(),
    )
}

async fn repos(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
    stub.record(&uri, &headers, None);
    (StatusCode::OK, stub.repos_body.to_string())
}

async fn repository(
    State(stub): State<Stub>,
    Path((owner, name)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    stub.record(&uri, &headers, None);
    if name == "missing" {
        return (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#.to_string());
    }
    (
        StatusCode::OK,
        json!({"name": name, "full_name": format!("{owner}/{name}"), "description": null}).to_string(),
    )
}

async fn issues(
    State(stub): State<Stub>,
    Path((owner, name)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let title = body["title"].as_str().unwrap_or_default().to_string();
    stub.record(&uri, &headers, Some(body));
    (
        stub.issue_status,
        json!({
            "number": 7,
            "title": title,
            "html_url": format!("https://github.com/{owner}/{name}/issues/7"),
        })
        .to_string(),
    )
}

/// Serve the stub and return its base URL.
async fn start_stub(stub: Stub) -> String {
    let router = Router::new()
        .route("/users/{account}", get(user))
        .route("/users/{account}/repos", get(repos))
        .route("/repos/{owner}/{name}", get(repository))
        .route("/repos/{owner}/{name}/issues", post(issues))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{addr}")
}

fn remote(base_url: &str) -> RemoteGitHub {
    let config = GitHubConfig::new("stub-token", "octocat").with_api_base_url(base_url);
    RemoteGitHub::new(Arc::new(config), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn profile_reads_user_then_repositories() {
    let stub = Stub::new();
    let github = remote(&start_stub(stub.clone()).await);

    let profile = github.fetch_profile().await.unwrap();
    assert_eq!(profile.user.login, "octocat");
    let names: Vec<_> = profile.repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["newest", "older"]);

    let hits = stub.hits();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].uri, "/users/octocat");
    assert_eq!(hits[1].uri, "/users/octocat/repos?type=owner&sort=updated&per_page=100");
    for hit in &hits {
        assert_eq!(hit.authorization.as_deref(), Some("Bearer stub-token"));
        assert_eq!(hit.accept.as_deref(), Some("application/vnd.github.v3+json"));
    }
}

#[tokio::test]
async fn profile_skips_repositories_when_user_fails() {
    let stub = Stub {
        user_status: StatusCode::NOT_FOUND,
        ..Stub::new()
    };
    let github = remote(&start_stub(stub.clone()).await);

    let err = github.fetch_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::RemoteRejected { status: 404, .. }));
    assert_eq!(stub.hits().len(), 1);
}

#[tokio::test]
async fn profile_with_garbled_repositories_fails_to_decode() {
    let stub = Stub {
        repos_body: "<html>oops</html>",
        ..Stub::new()
    };
    let github = remote(&start_stub(stub.clone()).await);

    let err = github.fetch_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::DecodeFailed(_)));
    assert_eq!(stub.hits().len(), 2);
}

#[tokio::test]
async fn missing_repository_is_rejected_with_404() {
    let stub = Stub::new();
    let github = remote(&start_stub(stub.clone()).await);

    let repo = github.fetch_repository("hello-world").await.unwrap();
    assert_eq!(repo.full_name, "octocat/hello-world");

    let err = github.fetch_repository("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_issue_sends_exactly_one_write() {
    let stub = Stub::new();
    let github = remote(&start_stub(stub.clone()).await);

    let issue = github
        .create_issue("hello-world", &IssueRequest::new("Found a bug", "Details"))
        .await
        .unwrap();
    assert_eq!(issue.number, 7);
    assert_eq!(issue.html_url, "https://github.com/octocat/hello-world/issues/7");

    let hits = stub.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "/repos/octocat/hello-world/issues");
    assert_eq!(hits[0].body, Some(json!({"title": "Found a bug", "body": "Details"})));
}

#[tokio::test]
async fn create_issue_answered_with_200_is_rejected() {
    let stub = Stub {
        issue_status: StatusCode::OK,
        ..Stub::new()
    };
    let github = remote(&start_stub(stub.clone()).await);

    let err = github
        .create_issue("hello-world", &IssueRequest::new("t", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::RemoteRejected { status: 200, .. }));
}

#[tokio::test]
async fn unreachable_remote_is_unavailable() {
    // Reserve a port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let github = remote(&format!("http://{addr}"));
    let err = github.fetch_repository("anything").await.unwrap_err();
    assert!(matches!(err, ApiError::RemoteUnavailable(_)));
}

#[tokio::test]
async fn end_to_end_issue_through_router() {
    let stub = Stub::new();
    let github = remote(&start_stub(stub.clone()).await);
    let router = app(AppState::new(Arc::new(github)), &["*".to_string()]);

    let resp = router
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/github/hello-world/issues")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"title":"From proxy","body":"Body"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["number"], 7);
    assert_eq!(body["title"], "From proxy");
    assert_eq!(stub.hits().len(), 1);
}

#[tokio::test]
async fn end_to_end_upstream_rejection_is_500() {
    let stub = Stub::new();
    let github = remote(&start_stub(stub.clone()).await);
    let router = app(AppState::new(Arc::new(github)), &["*".to_string()]);

    let resp = router
        .oneshot(
            axum::http::Request::builder()
                .uri("/github/missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("Not Found"));
}
