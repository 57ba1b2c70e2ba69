//! Internal statistics about scrapes, rendered by the `/health` endpoint.

use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock as StdRwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::error::{ReportError, SampleError};

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            *self = RunningStat {
                count: 1,
                sum: value,
                min: value,
                max: value,
                last: value,
            };
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// Returns `(last, avg, max, min, count)`.
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Health of the most recent scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastScrape {
    Never,
    /// At least one report mode succeeded.
    Ok,
    /// Every report mode failed; only stale values were served.
    AllFailed,
}

pub struct ScrapeStats {
    pub scrape_duration_seconds: Stat,
    pub sample_duration_ms: Stat,
    pub total_scrapes: AtomicU64,

    pub reports_succeeded: AtomicU64,
    pub execution_failures: AtomicU64,
    pub timeouts: AtomicU64,
    pub parsing_failures: AtomicU64,
    pub catalog_errors: AtomicU64,

    pub last_succeeded: AtomicU64,
    pub last_failed: AtomicU64,

    pub start_time: Instant,
    pub last_scrape_time: StdRwLock<Option<DateTime<Utc>>>,
}

impl Default for ScrapeStats {
    fn default() -> Self {
        Self {
            scrape_duration_seconds: Stat::default(),
            sample_duration_ms: Stat::default(),
            total_scrapes: AtomicU64::new(0),
            reports_succeeded: AtomicU64::new(0),
            execution_failures: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            parsing_failures: AtomicU64::new(0),
            catalog_errors: AtomicU64::new(0),
            last_succeeded: AtomicU64::new(0),
            last_failed: AtomicU64::new(0),
            start_time: Instant::now(),
            last_scrape_time: StdRwLock::new(None),
        }
    }
}

impl ScrapeStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_report_success(&self, duration_ms: f64) {
        self.reports_succeeded.fetch_add(1, Ordering::Relaxed);
        self.sample_duration_ms.add_sample(duration_ms);
    }

    pub fn record_report_failure(&self, error: &ReportError) {
        let counter = match error {
            ReportError::Sample(SampleError::Execution { .. }) => &self.execution_failures,
            ReportError::Sample(SampleError::Timeout { .. }) => &self.timeouts,
            ReportError::Malformed(_) => &self.parsing_failures,
            ReportError::Catalog(_) => &self.catalog_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scrape(&self, succeeded: u64, failed: u64, duration_seconds: f64) {
        self.total_scrapes.fetch_add(1, Ordering::Relaxed);
        self.scrape_duration_seconds.add_sample(duration_seconds);
        self.last_succeeded.store(succeeded, Ordering::Relaxed);
        self.last_failed.store(failed, Ordering::Relaxed);
        if let Ok(mut guard) = self.last_scrape_time.write() {
            *guard = Some(Utc::now());
        }
    }

    pub fn last_scrape(&self) -> LastScrape {
        if self.total_scrapes.load(Ordering::Relaxed) == 0 {
            return LastScrape::Never;
        }
        let succeeded = self.last_succeeded.load(Ordering::Relaxed);
        let failed = self.last_failed.load(Ordering::Relaxed);
        if succeeded == 0 && failed > 0 {
            LastScrape::AllFailed
        } else {
            LastScrape::Ok
        }
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn get_last_scrape_time_str(&self) -> String {
        match self.last_scrape_time.read() {
            Ok(guard) => guard
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            Err(_) => "N/A".to_string(),
        }
    }

    pub fn render_table(&self) -> String {
        let (sd_cur, sd_avg, sd_max, sd_min, _) = self.scrape_duration_seconds.snapshot();
        let (rd_cur, rd_avg, rd_max, rd_min, _) = self.sample_duration_ms.snapshot();

        let left_col = 26usize;
        let col_w = 12usize;

        let mut out = String::new();

        writeln!(out, "JSTAT EXPORTER - INTERNAL STATS").ok();
        writeln!(out, "===============================").ok();
        writeln!(out).ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "",
            "current",
            "average",
            "max",
            "min",
            left = left_col,
            col = col_w
        )
        .ok();
        writeln!(out, "{}", "-".repeat(left_col + 4 * (col_w + 3))).ok();

        for (label, cur, avg, max, min) in [
            ("scrape duration (s)", sd_cur, sd_avg, sd_max, sd_min),
            ("report duration (ms)", rd_cur, rd_avg, rd_max, rd_min),
        ] {
            writeln!(
                out,
                "{:left$} | {:>col$.3} | {:>col$.3} | {:>col$.3} | {:>col$.3}",
                label,
                cur,
                avg,
                max,
                min,
                left = left_col,
                col = col_w
            )
            .ok();
        }
        writeln!(out).ok();

        for (label, value) in [
            ("scrapes total", self.total_scrapes.load(Ordering::Relaxed)),
            ("reports succeeded", self.reports_succeeded.load(Ordering::Relaxed)),
            ("execution failures", self.execution_failures.load(Ordering::Relaxed)),
            ("timeouts", self.timeouts.load(Ordering::Relaxed)),
            ("parsing failures", self.parsing_failures.load(Ordering::Relaxed)),
            ("catalog errors", self.catalog_errors.load(Ordering::Relaxed)),
            ("last scrape ok reports", self.last_succeeded.load(Ordering::Relaxed)),
            ("last scrape failed reports", self.last_failed.load(Ordering::Relaxed)),
        ] {
            writeln!(out, "{:left$} | {:>col$}", label, value, left = left_col, col = col_w).ok();
        }
        writeln!(out).ok();
        writeln!(out, "last scrape: {}", self.get_last_scrape_time_str()).ok();

        out
    }
}
