//! jstat-exporter - version 0.1.0
//!
//! Prometheus exporter for JVM memory pool metrics sampled with jstat.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod startup_checks;
mod state;

use axum::{routing::get, Router};
use clap::Parser;
use jstat_exporter::{catalog, Collector, ExporterMetrics, JstatSampler, ScrapeStats};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, warn, Level};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_test};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR, DEFAULT_PORT,
};
use handlers::{config_handler, health_handler, metrics_handler, root_handler};
use state::AppState;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", args.log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    if let Some(command) = &args.command {
        let config = load_validated_config(&args)?;
        setup_logging(&args);

        return match command {
            Commands::Check => command_check(&config),
            Commands::Test { iterations, format } => {
                command_test(*iterations, format.clone(), &config).await
            }
        };
    }

    let config = load_validated_config(&args)?;

    setup_logging(&args);

    info!("Starting jstat-exporter");

    let jstat_path = config.jstat_path();
    if let Err(e) = startup_checks::validate_requirements(&jstat_path, config.target_pid()) {
        error!("❌ Startup validation failed: {}", e);
        error!("   The exporter will start but every report will fail until this is fixed!");
    }

    let reports = catalog::select(&config.report_modes());
    info!(
        "Sampling report modes: {}",
        reports
            .iter()
            .map(|s| s.mode.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let sampler = JstatSampler::new(jstat_path, config.target_pid(), config.sampler_timeout());
    let stats = Arc::new(ScrapeStats::new());

    // An inconsistent catalog is a programming defect: refuse to start.
    let collector = Collector::new(sampler, reports.clone(), stats.clone())?;
    let metrics = ExporterMetrics::new(&reports)?;
    debug!("All metrics registered successfully");

    let state = Arc::new(AppState {
        collector,
        metrics,
        stats,
        config: Arc::new(config.clone()),
    });

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let bind_ip: IpAddr = bind_ip_str.parse()?;
    let addr = SocketAddr::new(bind_ip, port);

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route(config.metrics_path(), get(metrics_handler))
        .route("/config", get(config_handler));

    if config.enable_health.unwrap_or(true) {
        app = app.route("/health", get(health_handler));
    } else {
        warn!("/health endpoint disabled");
    }

    let app = app.with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!(
        "jstat-exporter listening on http://{}{}",
        addr,
        config.metrics_path()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            e
        })?;

    info!("jstat-exporter stopped gracefully");
    Ok(())
}
