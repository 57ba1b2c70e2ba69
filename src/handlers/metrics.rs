//! Metrics endpoint handler for Prometheus scraping.
//!
//! Every request runs one fresh sampling cycle and serves its result. Report
//! modes that fail during the cycle keep their last known values, so the
//! endpoint only fails if encoding itself fails.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::state::SharedState;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response()
    }
}

/// Handler for the metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, MetricsError> {
    let start = Instant::now();
    debug!("Processing metrics request");

    let result = state.collector.scrape().await;

    let body = state
        .metrics
        .render(&result, start.elapsed())
        .map_err(|e| {
            error!("Failed to encode Prometheus metrics: {}", e);
            MetricsError::EncodingFailed
        })?;

    debug!(
        "Metrics request completed: {}/{} reports ok, {} bytes, {:.3}ms",
        result.succeeded(),
        result.reports.len(),
        body.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
