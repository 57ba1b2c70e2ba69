//! Root endpoint handler for the landing page.
//!
//! This module provides the `/` endpoint handler that links to the
//! metrics path and the other endpoints.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let version = env!("CARGO_PKG_VERSION");
    let metrics_path = state.config.metrics_path();

    let uptime_secs = state.stats.get_uptime_seconds();
    let uptime_str = format!(
        "{}h {}m {}s",
        uptime_secs / 3600,
        (uptime_secs % 3600) / 60,
        uptime_secs % 60
    );

    let health_link = if state.config.enable_health.unwrap_or(true) {
        r#"<li><a href="/health">/health</a> - internal scrape statistics</li>"#
    } else {
        ""
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>JStat Exporter</title>
</head>
<body>
    <h1>JStat Exporter</h1>
    <p>Version {version} - target {target} - uptime {uptime}</p>
    <p><a href="{metrics_path}">Metrics</a></p>
    <ul>
        <li><a href="{metrics_path}">{metrics_path}</a> - Prometheus metrics (samples jstat on every request)</li>
        {health_link}
        <li><a href="/config">/config</a> - active configuration</li>
    </ul>
</body>
</html>"#,
        version = version,
        target = state.collector.sampler().target(),
        uptime = uptime_str,
        metrics_path = metrics_path,
        health_link = health_link,
    );

    Html(html)
}
