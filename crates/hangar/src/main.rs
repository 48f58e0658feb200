use std::process::ExitCode;
use std::sync::Arc;

use log::error;

use hangar::config::Config;
use hangar::logging;
use hangar::server::{self, AppState};
use hangar_core::{
    DEFAULT_POLL_INTERVAL, GithubClient, ReleaseCache, ReleaseSource, build_http_client,
};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("Failed to load configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    let http = match build_http_client() {
        Ok(http) => http,
        Err(error) => {
            error!("Failed to build HTTP client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let source: Arc<dyn ReleaseSource> = Arc::new(GithubClient::new(
        http,
        &config.owner,
        &config.repository,
        &config.token,
    ));
    let cache = ReleaseCache::spawn(Arc::clone(&source), DEFAULT_POLL_INTERVAL);
    let state = AppState { cache, source };

    if let Err(error) = server::run(&config, state).await {
        error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
