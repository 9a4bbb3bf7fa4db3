//! Router assembly.
//!
//! `/healthz` answers JSON; every other path is looked up in the dist
//! directory, and misses fall back to `index.html` so client-side routes
//! such as `/registrar-notas` survive a reload.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use axum::Json;
use axum::Router;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::HostConfig;

pub fn app(config: &HostConfig) -> Router {
    let index = config.dist_dir.join("index.html");
    let assets = ServeDir::new(&config.dist_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(index));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(assets)
        .layer(CompressionLayer::new().gzip(true))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
