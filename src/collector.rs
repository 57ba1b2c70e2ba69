//! Scrape orchestration: sample, parse and update every report mode in turn.
//!
//! Sampling is lazy: one scrape runs one fresh sampling cycle. A failing report
//! mode is logged and skipped, leaving its metrics at their last known values,
//! and never aborts the scrape. One scrape cycle (all updates plus the final
//! snapshot) runs under a single lock so concurrent scrapes cannot produce a
//! snapshot that mixes two sampling instants.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::catalog::{ReportMode, ReportSpec};
use crate::error::{CatalogError, ReportError};
use crate::parser;
use crate::registry::{MetricRegistry, MetricValue};
use crate::sampler::Sampler;
use crate::scrape_stats::ScrapeStats;

/// What happened to one report mode during a scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub mode: ReportMode,
    pub success: bool,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metric values served for one scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    pub taken_at: DateTime<Utc>,
    pub metrics: Vec<MetricValue>,
    pub reports: Vec<ReportOutcome>,
}

impl ScrapeResult {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.name == name).map(|m| m.value)
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }
}

pub struct Collector<S> {
    sampler: S,
    reports: Vec<ReportSpec>,
    registry: MetricRegistry,
    stats: Arc<ScrapeStats>,
    cycle: Mutex<()>,
}

impl<S: Sampler> Collector<S> {
    /// Declares every metric of `reports` and builds the collector.
    ///
    /// Fails if two reports declare the same metric differently.
    pub fn new(
        sampler: S,
        reports: Vec<ReportSpec>,
        stats: Arc<ScrapeStats>,
    ) -> Result<Self, CatalogError> {
        let registry = MetricRegistry::new();
        for spec in &reports {
            for extraction in spec.columns {
                registry.declare(extraction.metric, extraction.help)?;
            }
        }
        info!(
            reports = reports.len(),
            metrics = registry.len(),
            "metric catalog declared"
        );

        Ok(Self {
            sampler,
            reports,
            registry,
            stats,
            cycle: Mutex::new(()),
        })
    }

    pub fn reports(&self) -> &[ReportSpec] {
        &self.reports
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Runs one full sampling cycle and returns the resulting metric set.
    ///
    /// Always returns a result; values of failed reports are the last known
    /// ones (zero before the first success).
    pub async fn scrape(&self) -> ScrapeResult {
        let _cycle = self.cycle.lock().await;
        let started = Instant::now();

        let mut outcomes = Vec::with_capacity(self.reports.len());
        for spec in &self.reports {
            let report_start = Instant::now();
            let result = self.collect_report(spec).await;
            let duration = report_start.elapsed();

            let outcome = match result {
                Ok(updated) => {
                    debug!(mode = %spec.mode, updated, "report updated");
                    self.stats
                        .record_report_success(duration.as_secs_f64() * 1000.0);
                    ReportOutcome {
                        mode: spec.mode,
                        success: true,
                        duration,
                        error: None,
                    }
                }
                Err(e) => {
                    if let ReportError::Catalog(_) = e {
                        error!(mode = %spec.mode, error = %e, "metric catalog inconsistent");
                    } else {
                        warn!(
                            mode = %spec.mode,
                            kind = e.kind(),
                            error = %e,
                            "report failed, keeping last known values"
                        );
                    }
                    self.stats.record_report_failure(&e);
                    ReportOutcome {
                        mode: spec.mode,
                        success: false,
                        duration,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let result = ScrapeResult {
            taken_at: Utc::now(),
            metrics: self.registry.snapshot(),
            reports: outcomes,
        };

        self.stats.record_scrape(
            result.succeeded() as u64,
            result.failed() as u64,
            started.elapsed().as_secs_f64(),
        );
        debug!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "scrape published"
        );

        result
    }

    async fn collect_report(&self, spec: &ReportSpec) -> Result<usize, ReportError> {
        debug!(mode = %spec.mode, "sampling");
        let sample = self.sampler.sample(spec.mode).await?;

        debug!(mode = %spec.mode, bytes = sample.output.len(), "parsing");
        let fields = parser::parse(&sample.output, spec)?;

        debug!(mode = %spec.mode, fields = fields.len(), "updating");
        self.registry.update_all(&fields, sample.captured_at)?;
        Ok(fields.len())
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
