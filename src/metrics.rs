//! Prometheus exposition of scrape results.
//!
//! The catalog gauges mirror the registry snapshot of each scrape; the
//! remaining series describe the exporter itself.

use ahash::AHashMap as HashMap;
use prometheus::{Counter, CounterVec, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Mutex;
use std::time::Duration;

use crate::catalog::{ReportSpec, NAMESPACE};
use crate::collector::ScrapeResult;

/// Buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 16 * 1024;

pub struct ExporterMetrics {
    registry: Registry,
    values: HashMap<String, Gauge>,
    report_success: GaugeVec,
    report_duration_seconds: GaugeVec,
    report_failures_total: CounterVec,
    last_update_timestamp_seconds: GaugeVec,
    scrape_duration_seconds: Gauge,
    scrapes_total: Counter,
    publish: Mutex<()>,
}

impl ExporterMetrics {
    /// Creates and registers one gauge per catalog metric plus the exporter series.
    pub fn new(reports: &[ReportSpec]) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let mut values = HashMap::new();
        for spec in reports {
            for extraction in spec.columns {
                if values.contains_key(extraction.metric) {
                    continue;
                }
                let gauge =
                    Gauge::with_opts(Opts::new(extraction.metric, extraction.help).namespace(NAMESPACE))?;
                registry.register(Box::new(gauge.clone()))?;
                values.insert(extraction.metric.to_string(), gauge);
            }
        }

        let report_success = GaugeVec::new(
            Opts::new(
                "report_success",
                "Whether the report mode was sampled and parsed successfully in the last scrape (1) or not (0)",
            )
            .namespace(NAMESPACE),
            &["mode"],
        )?;
        let report_duration_seconds = GaugeVec::new(
            Opts::new(
                "report_duration_seconds",
                "Time spent sampling and parsing the report mode in the last scrape",
            )
            .namespace(NAMESPACE),
            &["mode"],
        )?;
        let report_failures_total = CounterVec::new(
            Opts::new(
                "report_failures_total",
                "Number of scrapes in which the report mode failed",
            )
            .namespace(NAMESPACE),
            &["mode"],
        )?;
        let last_update_timestamp_seconds = GaugeVec::new(
            Opts::new(
                "last_update_timestamp_seconds",
                "Unix time of the sample that last updated the metric",
            )
            .namespace(NAMESPACE),
            &["metric"],
        )?;
        let scrape_duration_seconds = Gauge::with_opts(
            Opts::new("scrape_duration_seconds", "Time spent on the last scrape").namespace(NAMESPACE),
        )?;
        let scrapes_total = Counter::with_opts(
            Opts::new("scrapes_total", "Number of scrapes served").namespace(NAMESPACE),
        )?;

        registry.register(Box::new(report_success.clone()))?;
        registry.register(Box::new(report_duration_seconds.clone()))?;
        registry.register(Box::new(report_failures_total.clone()))?;
        registry.register(Box::new(last_update_timestamp_seconds.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;
        registry.register(Box::new(scrapes_total.clone()))?;

        for spec in reports {
            let mode = spec.mode.as_str();
            report_success.with_label_values(&[mode]).set(0.0);
            report_failures_total.with_label_values(&[mode]);
        }

        Ok(Self {
            registry,
            values,
            report_success,
            report_duration_seconds,
            report_failures_total,
            last_update_timestamp_seconds,
            scrape_duration_seconds,
            scrapes_total,
            publish: Mutex::new(()),
        })
    }

    /// Publishes `result` and encodes the whole registry in text format.
    pub fn render(
        &self,
        result: &ScrapeResult,
        scrape_duration: Duration,
    ) -> Result<String, prometheus::Error> {
        let _publish = self.publish.lock().unwrap_or_else(|e| e.into_inner());

        for metric in &result.metrics {
            if let Some(gauge) = self.values.get(&metric.name) {
                gauge.set(metric.value);
            }
            if let Some(at) = metric.updated_at {
                self.last_update_timestamp_seconds
                    .with_label_values(&[metric.name.as_str()])
                    .set(at.timestamp_millis() as f64 / 1000.0);
            }
        }

        for report in &result.reports {
            let mode = report.mode.as_str();
            self.report_success
                .with_label_values(&[mode])
                .set(if report.success { 1.0 } else { 0.0 });
            self.report_duration_seconds
                .with_label_values(&[mode])
                .set(report.duration.as_secs_f64());
            if !report.success {
                self.report_failures_total.with_label_values(&[mode]).inc();
            }
        }

        self.scrape_duration_seconds.set(scrape_duration.as_secs_f64());
        self.scrapes_total.inc();

        let families = self.registry.gather();
        let mut buffer = Vec::with_capacity(BUFFER_CAP);
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
