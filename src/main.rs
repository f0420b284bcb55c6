mod config;
mod middleware;
mod multifrontmatter;
mod mux;
mod render;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::mux::MuxError;
use crate::services::ContentError;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("content failed to load: {0}")]
    Content(#[from] ContentError),
    #[error("route table: {0}")]
    Mux(#[from] MuxError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(config::DEFAULT_LOG_LEVEL);
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "startup failed");
        std::process::exit(1);
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let content = state::Content::load(&config.content_dir)?;
    tracing::info!(
        posts = content.blog.list().len(),
        presentations = content.presentations.len(),
        "content loaded"
    );

    let state = state::AppState::in_memory(&config, content);
    if state.policy.is_empty() {
        tracing::warn!("ADMIN_LOGINS is empty; /admin is closed to everyone");
    }
    if !config.admin_sessions.is_empty() {
        tracing::info!(count = config.admin_sessions.len(), "admin sessions seeded");
    }

    let app = routes::app(state)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    tracing::info!(addr = %config.bind_addr(), base_url = %config.base_url, "homepage listening");
    axum::serve(listener, app).await?;
    Ok(())
}
