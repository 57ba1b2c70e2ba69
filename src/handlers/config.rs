//! Configuration display endpoint handler.
//!
//! This module provides the `/config` endpoint handler that displays
//! the current exporter configuration.

use axum::{extract::State, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_PORT};
use crate::state::SharedState;

/// Handler for the /config endpoint.
#[instrument(skip(state))]
pub async fn config_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /config request");

    let cfg = &state.config;

    let mut out = String::new();

    writeln!(out, "JSTAT EXPORTER - CONFIGURATION").ok();
    writeln!(out, "==============================").ok();
    writeln!(out).ok();

    writeln!(out, "SERVER CONFIGURATION").ok();
    writeln!(out, "--------------------").ok();
    writeln!(
        out,
        "bind:                 {}",
        cfg.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    )
    .ok();
    writeln!(out, "port:                 {}", cfg.port.unwrap_or(DEFAULT_PORT)).ok();
    writeln!(out, "metrics_path:         {}", cfg.metrics_path()).ok();
    writeln!(
        out,
        "enable_health:        {}",
        cfg.enable_health.unwrap_or(true)
    )
    .ok();
    writeln!(out).ok();

    writeln!(out, "SAMPLING").ok();
    writeln!(out, "--------").ok();
    let sampler = state.collector.sampler();
    writeln!(out, "jstat_path:           {}", sampler.tool().display()).ok();
    writeln!(out, "target_pid:           {}", sampler.target()).ok();
    writeln!(
        out,
        "sampler_timeout:      {} ms",
        cfg.sampler_timeout().as_millis()
    )
    .ok();
    writeln!(out).ok();

    writeln!(out, "REPORTS").ok();
    writeln!(out, "-------").ok();
    for spec in state.collector.reports() {
        let metrics: Vec<&str> = spec.metric_names().collect();
        writeln!(out, "{:<16} {:<18} {}", spec.mode, spec.mode.flag(), metrics.join(", ")).ok();
    }

    (
        [("Content-Type", "text/plain; charset=utf-8")],
        out,
    )
}
