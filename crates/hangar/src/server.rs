use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use hangar_core::{ReleaseCache, ReleaseSource};
use log::info;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::routes;

/// State shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    pub cache: ReleaseCache,
    pub source: Arc<dyn ReleaseSource>,
}

/// Build the update router over `state`.
///
/// Separate from [`run`] so integration tests can drive the router without
/// binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new().merge(routes::update_routes()).with_state(state)
}

/// Bind the listener and serve until the process is terminated.
///
/// # Errors
/// Returns an error when the address cannot be bound or the accept loop
/// fails.
pub async fn run(config: &Config, state: AppState) -> std::io::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server on port {}", config.port);

    axum::serve(listener, router(state)).await
}
