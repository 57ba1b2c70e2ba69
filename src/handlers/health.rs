//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that returns
//! the exporter's internal scrape statistics.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use jstat_exporter::scrape_stats::LastScrape;
use tracing::{debug, instrument};

use crate::state::SharedState;

// Time conversion constants
const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    let (status, message) = match state.stats.last_scrape() {
        LastScrape::Never => (StatusCode::OK, "OK - No scrape yet"),
        LastScrape::Ok => (StatusCode::OK, "OK"),
        LastScrape::AllFailed => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Last scrape failed for every report mode",
        ),
    };

    let uptime_hours = state.stats.get_uptime_seconds() as f64 / SECONDS_PER_HOUR;
    let uptime_str = if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    };

    let table = state.stats.render_table();

    debug!("Health check: {} - {}", status, message);
    (
        status,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!("{message}\n\nUptime: {uptime_str}\n\n{table}"),
    )
}
