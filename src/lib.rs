//! jstat exporter library
//!
//! Samples a JVM's memory pool state through the `jstat` tool, parses its
//! fixed-layout tabular output and republishes selected columns as Prometheus
//! gauges. Each scrape triggers one fresh sampling cycle.
//!
//! # Components
//!
//! - [`sampler`]: runs `jstat <flag> <pid>` with a bounded timeout
//! - [`parser`]: extracts numeric columns from the first data line
//! - [`registry`]: holds the last known value of every declared metric
//! - [`collector`]: drives sampler, parser and registry for each report mode
//! - [`metrics`]: Prometheus text exposition of a scrape result
//!
//! # Usage
//!
//! ```rust,no_run
//! use jstat_exporter::{catalog, Collector, JstatSampler, ScrapeStats};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let sampler = JstatSampler::new("/usr/bin/jstat", "12345", Duration::from_secs(5));
//! let collector = Collector::new(sampler, catalog::CATALOG.to_vec(), Arc::new(ScrapeStats::new()))?;
//!
//! let result = collector.scrape().await;
//! println!("oldUsed = {:?}", result.value("oldUsed"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod collector;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod registry;
pub mod sampler;
pub mod scrape_stats;

// Re-export main types for convenience
pub use catalog::{Extraction, ReportMode, ReportSpec, CATALOG};
pub use collector::{Collector, ReportOutcome, ScrapeResult};
pub use error::{
    CatalogError, ExecutionError, MalformedOutputError, MalformedReason, ReportError, SampleError,
};
pub use metrics::ExporterMetrics;
pub use registry::{MetricRegistry, MetricValue};
pub use sampler::{JstatSampler, Sample, Sampler};
pub use scrape_stats::ScrapeStats;
