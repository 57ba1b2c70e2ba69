//! Configuration management for jstat-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use jstat_exporter::ReportMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9010;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_JSTAT_PATH: &str = "/usr/bin/jstat";
pub const DEFAULT_TARGET_PID: &str = "0";
pub const DEFAULT_SAMPLER_TIMEOUT_MS: u64 = 5000;

const MAX_SAMPLER_TIMEOUT_MS: u64 = 600_000;

/// Paths served by the exporter itself; the metrics path must not shadow them.
const RESERVED_PATHS: &[&str] = &["/", "/health", "/config"];

/// Exporter configuration. Unset fields fall back to the defaults above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,
    #[serde(alias = "metrics-path", alias = "telemetry_path")]
    pub metrics_path: Option<String>,

    // Sampling
    #[serde(alias = "jstat-path")]
    pub jstat_path: Option<PathBuf>,
    #[serde(alias = "target-pid")]
    pub target_pid: Option<String>,
    #[serde(alias = "sampler-timeout-ms")]
    pub sampler_timeout_ms: Option<u64>,
    pub reports: Option<Vec<ReportMode>>,

    // Feature flags
    #[serde(alias = "enable-health")]
    pub enable_health: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            metrics_path: Some(DEFAULT_METRICS_PATH.to_string()),
            jstat_path: Some(PathBuf::from(DEFAULT_JSTAT_PATH)),
            target_pid: Some(DEFAULT_TARGET_PID.to_string()),
            sampler_timeout_ms: Some(DEFAULT_SAMPLER_TIMEOUT_MS),
            reports: None,
            enable_health: Some(true),
        }
    }
}

impl Config {
    pub fn metrics_path(&self) -> &str {
        self.metrics_path.as_deref().unwrap_or(DEFAULT_METRICS_PATH)
    }

    pub fn jstat_path(&self) -> PathBuf {
        self.jstat_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JSTAT_PATH))
    }

    pub fn target_pid(&self) -> &str {
        self.target_pid.as_deref().unwrap_or(DEFAULT_TARGET_PID)
    }

    pub fn sampler_timeout(&self) -> Duration {
        Duration::from_millis(self.sampler_timeout_ms.unwrap_or(DEFAULT_SAMPLER_TIMEOUT_MS))
    }

    /// Enabled report modes; all catalog modes when unset.
    pub fn report_modes(&self) -> Vec<ReportMode> {
        match &self.reports {
            Some(modes) => modes.clone(),
            None => jstat_exporter::CATALOG.iter().map(|s| s.mode).collect(),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let bind = cfg.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    if bind.parse::<std::net::IpAddr>().is_err() {
        return Err(format!("bind '{}' is not a valid IP address", bind).into());
    }

    let metrics_path = cfg.metrics_path();
    if !metrics_path.starts_with('/') {
        return Err(format!("metrics_path '{}' must start with '/'", metrics_path).into());
    }
    if RESERVED_PATHS.contains(&metrics_path) {
        return Err(format!(
            "metrics_path '{}' collides with a built-in endpoint",
            metrics_path
        )
        .into());
    }

    let target = cfg.target_pid();
    if target.is_empty() {
        return Err("target_pid must not be empty".into());
    }
    if target.chars().any(char::is_whitespace) {
        return Err(format!("target_pid '{}' must not contain whitespace", target).into());
    }

    if cfg.jstat_path().as_os_str().is_empty() {
        return Err("jstat_path must not be empty".into());
    }

    match cfg.sampler_timeout_ms {
        Some(0) => return Err("sampler_timeout_ms must be greater than 0".into()),
        Some(ms) if ms > MAX_SAMPLER_TIMEOUT_MS => {
            return Err(format!(
                "sampler_timeout_ms {} exceeds the maximum of {}",
                ms, MAX_SAMPLER_TIMEOUT_MS
            )
            .into());
        }
        _ => {}
    }

    if cfg.reports.as_ref().is_some_and(|r| r.is_empty()) {
        return Err("reports must name at least one report mode".into());
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }
    if let Some(path) = &args.metrics_path {
        config.metrics_path = Some(path.clone());
    }
    if let Some(path) = &args.jstat_path {
        config.jstat_path = Some(path.clone());
    }
    if let Some(pid) = &args.target_pid {
        config.target_pid = Some(pid.clone());
    }
    if let Some(ms) = args.sampler_timeout_ms {
        config.sampler_timeout_ms = Some(ms);
    }
    if !args.reports.is_empty() {
        config.reports = Some(args.reports.clone());
    }
    if args.disable_health {
        config.enable_health = Some(false);
    }

    Ok(config)
}

/// Loads a config file, trying the default locations when no path is given.
///
/// Missing fields in the file keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/jstat-exporter/config.yaml",
                "/etc/jstat-exporter/config.yml",
                "/etc/jstat-exporter/config.json",
                "./jstat-exporter.yaml",
                "./jstat-exporter.yml",
                "./jstat-exporter.json",
            ];

            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;

    let loaded: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)?,
    };
    info!("Loaded configuration from: {}", path.display());

    Ok(merge_defaults(loaded))
}

fn merge_defaults(loaded: Config) -> Config {
    let defaults = Config::default();
    Config {
        port: loaded.port.or(defaults.port),
        bind: loaded.bind.or(defaults.bind),
        metrics_path: loaded.metrics_path.or(defaults.metrics_path),
        jstat_path: loaded.jstat_path.or(defaults.jstat_path),
        target_pid: loaded.target_pid.or(defaults.target_pid),
        sampler_timeout_ms: loaded.sampler_timeout_ms.or(defaults.sampler_timeout_ms),
        reports: loaded.reports.or(defaults.reports),
        enable_health: loaded.enable_health.or(defaults.enable_health),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_metrics_path_rules() {
        let mut cfg = Config::default();
        cfg.metrics_path = Some("metrics".into());
        assert!(validate_effective_config(&cfg).is_err());

        cfg.metrics_path = Some("/health".into());
        assert!(validate_effective_config(&cfg).is_err());

        cfg.metrics_path = Some("/prometheus".into());
        assert!(validate_effective_config(&cfg).is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut cfg = Config::default();
        cfg.sampler_timeout_ms = Some(0);
        assert!(validate_effective_config(&cfg).is_err());
        cfg.sampler_timeout_ms = Some(MAX_SAMPLER_TIMEOUT_MS + 1);
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_empty_reports_rejected() {
        let mut cfg = Config::default();
        cfg.reports = Some(vec![]);
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_yaml_merges_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "target_pid: \"4242\"\nreports: [gcold, gcutil]").unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.target_pid(), "4242");
        assert_eq!(cfg.report_modes(), vec![ReportMode::GcOld, ReportMode::GcUtil]);
        assert_eq!(cfg.port, Some(DEFAULT_PORT));
        assert_eq!(cfg.metrics_path(), DEFAULT_METRICS_PATH);
    }

    #[test]
    fn test_load_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 9999\njstat_path = \"/opt/jdk/bin/jstat\"").unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.port, Some(9999));
        assert_eq!(cfg.jstat_path(), PathBuf::from("/opt/jdk/bin/jstat"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/jstat-exporter.yaml"))).is_err());
    }
}
