//! Startup requirement validation for jstat-exporter.
//!
//! This module validates that the jstat executable is usable and that the
//! target JVM is visible before the exporter starts serving.

use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(jstat_path: &Path, target: &str) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_jstat(jstat_path)?;
    check_target(target);

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check that the jstat executable exists and can be executed
fn check_jstat(path: &Path) -> Result<(), ValidationError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("❌ jstat not found at {}", path.display());
            error!("   Solution: install a JDK or pass --jstat-path <path/to/jstat>");
            return Err(ValidationError::JstatNotFound(path.display().to_string()));
        }
        Err(e) => {
            error!("❌ Cannot access {}: {}", path.display(), e);
            return Err(ValidationError::JstatNotExecutable(e.to_string()));
        }
    };

    if !metadata.is_file() {
        error!("❌ {} is not a regular file", path.display());
        return Err(ValidationError::JstatNotExecutable(
            "not a regular file".to_string(),
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            error!("❌ {} is not executable", path.display());
            return Err(ValidationError::JstatNotExecutable(
                "missing execute permission".to_string(),
            ));
        }
    }

    info!("✅ jstat found at {}", path.display());
    Ok(())
}

/// Check whether the target JVM is visible. Never fatal: the JVM may start later.
fn check_target(target: &str) {
    // Remote vmids (pid@host) cannot be checked locally.
    let Ok(pid) = target.parse::<u32>() else {
        debug!("Target '{}' is not a local pid, skipping check", target);
        return;
    };

    if pid == 0 {
        warn!("⚠️  target pid is 0 - every sample will fail until --target-pid is set");
        return;
    }

    if Path::new("/proc").exists() && !Path::new(&format!("/proc/{}", pid)).exists() {
        warn!("⚠️  Process {} not found - metrics stay at their last known values", pid);
    } else {
        info!("✅ Target process {} visible", pid);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("jstat not found: {0}")]
    JstatNotFound(String),

    #[error("jstat not executable: {0}")]
    JstatNotExecutable(String),
}
