use std::path::PathBuf;

use clap::Parser;
use gh_proxy_server::{config::Config, AppState, RemoteGitHub};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// REST proxy for a single GitHub account: profile, repository lookup and
/// issue creation.
#[derive(Parser, Debug)]
#[command(name = "gh-proxy", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ./gh-proxy.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.log_level);

    let github = config.github_config()?;
    info!(account = %github.account, api_url = %github.api_base_url, "loaded configuration");

    let remote = RemoteGitHub::new(github, config.request_timeout())?;
    let state = AppState::new(std::sync::Arc::new(remote));

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "Starting server");
    gh_proxy_server::run(listener, state, &config.cors.allow_origins).await?;
    Ok(())
}

/// JSON records to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let (filter, fallback) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, false),
            Err(_) => (EnvFilter::new("info"), true),
        },
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if fallback {
        warn!(level, "unknown log level, using info");
    }
}
