//! HTTP surface of the GitHub account proxy.
//!
//! | Method | Path                   | Handler                      |
//! |--------|------------------------|------------------------------|
//! | GET    | `/health`              | [`handlers::health`]         |
//! | GET    | `/github`              | [`handlers::get_profile`]    |
//! | GET    | `/github/{repo}`       | [`handlers::get_repository`] |
//! | POST   | `/github/{repo}/issues`| [`handlers::create_issue`]   |
//!
//! Anything else is a 404.

pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod middleware;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

pub use github::{GitHubApi, RemoteGitHub};

/// Shared per-process state. The only member is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<dyn GitHubApi>,
}

impl AppState {
    pub fn new(github: Arc<dyn GitHubApi>) -> Self {
        Self { github }
    }
}

pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/github", get(handlers::get_profile))
        .route("/github/", get(handlers::missing_repo_name))
        .route("/github/{repo}", get(handlers::get_repository))
        .route("/github//issues", post(handlers::missing_repo_name))
        .route("/github/{repo}/issues", post(handlers::create_issue))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(middleware::recover_panics())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(middleware::cors(allowed_origins))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState, allowed_origins: &[String]) -> Result<(), std::io::Error> {
    let app = app(state, allowed_origins);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
