use std::process::ExitCode;

use bikeshare_server::config::ServerConfig;
use bikeshare_server::gbfs::FeedClient;
use bikeshare_server::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        feed = %config.feed.base_url,
        stations = config.feed.allow_list.len(),
        ttl_secs = config.feed.ttl.as_secs(),
        "configured GBFS feed"
    );

    let feed = match FeedClient::new(config.feed.clone()) {
        Ok(feed) => feed,
        Err(e) => {
            error!("failed to create feed client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(feed);
    let app = create_router(state, &config.allowed_origins);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Bike share API listening on http://{}", config.bind);
    info!("  GET /health               - Health check");
    info!("  GET /api/stations         - Allow-listed station metadata");
    info!("  GET /api/stations/status  - Live availability with totals");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
