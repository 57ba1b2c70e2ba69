//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use jstat_exporter::{Collector, ExporterMetrics, JstatSampler, ScrapeStats};
use std::sync::Arc;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub collector: Collector<JstatSampler>,
    pub metrics: ExporterMetrics,
    pub stats: Arc<ScrapeStats>,
    pub config: Arc<Config>,
}
