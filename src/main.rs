//! Static host for the Class Central single-page app.
//!
//! Serves the trunk-built client bundle, falls back to `index.html` for deep
//! links so the client router can resolve them, and exposes `/healthz`.

mod config;
mod error;
mod routes;

use crate::config::HostConfig;
use crate::error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = HostConfig::from_env()?;
    if !config.dist_dir.join("index.html").is_file() {
        tracing::warn!(dist = %config.dist_dir.display(), "index.html not found; run `trunk build` in client/");
    }

    let app = routes::app(&config);
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await.map_err(ServerError::Bind)?;

    tracing::info!(addr = %config.socket_addr(), dist = %config.dist_dir.display(), "class-central listening");
    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
