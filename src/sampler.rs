//! Invocation of the external jstat tool.
//!
//! Each call runs `<tool> <flag> <target>` once and captures stdout. The call
//! is bounded by a timeout; a child that overruns it is killed and reaped
//! before the error is returned. No retries happen here.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::catalog::ReportMode;
use crate::error::{ExecutionError, SampleError};

/// Raw output of one tool invocation.
#[derive(Debug, Clone)]
pub struct Sample {
    pub mode: ReportMode,
    pub output: String,
    pub captured_at: DateTime<Utc>,
}

impl Sample {
    pub fn new(mode: ReportMode, output: impl Into<String>) -> Self {
        Self {
            mode,
            output: output.into(),
            captured_at: Utc::now(),
        }
    }
}

/// Source of raw report output.
pub trait Sampler: Send + Sync {
    fn sample(&self, mode: ReportMode) -> impl Future<Output = Result<Sample, SampleError>> + Send;
}

/// Sampler that shells out to jstat.
#[derive(Debug, Clone)]
pub struct JstatSampler {
    tool: PathBuf,
    target: String,
    timeout: Duration,
}

impl JstatSampler {
    pub fn new(tool: impl Into<PathBuf>, target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            target: target.into(),
            timeout,
        }
    }

    pub fn tool(&self) -> &PathBuf {
        &self.tool
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    async fn run(&self, mode: ReportMode) -> Result<String, SampleError> {
        let execution = |source| SampleError::Execution { mode, source };

        let mut child = Command::new(&self.tool)
            .arg(mode.flag())
            .arg(&self.target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                execution(if e.kind() == std::io::ErrorKind::NotFound {
                    ExecutionError::ToolNotFound {
                        tool: self.tool.clone(),
                    }
                } else {
                    ExecutionError::Spawn {
                        tool: self.tool.clone(),
                        source: e,
                    }
                })
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| execution(std::io::Error::other("stdout not captured").into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| execution(std::io::Error::other("stderr not captured").into()))?;

        let completed = tokio::time::timeout(self.timeout, async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let (status, _, _) = tokio::try_join!(
                child.wait(),
                stdout.read_to_end(&mut out),
                stderr.read_to_end(&mut err)
            )?;
            Ok::<_, std::io::Error>((status, out, err))
        })
        .await;

        let (status, out, err) = match completed {
            Ok(result) => result.map_err(|e| execution(e.into()))?,
            Err(_) => {
                // kill() also waits, so the child is reaped before we return.
                if let Err(e) = child.kill().await {
                    warn!(mode = %mode, error = %e, "failed to kill timed out jstat");
                }
                return Err(SampleError::Timeout {
                    mode,
                    timeout: self.timeout,
                });
            }
        };

        let out = String::from_utf8_lossy(&out).into_owned();
        if !status.success() {
            let err = String::from_utf8_lossy(&err).trim().to_string();
            // jstat reports a vanished JVM as "<vmid> not found" and exits 1.
            if out.contains("not found") || err.contains("not found") {
                return Err(execution(ExecutionError::TargetNotFound {
                    target: self.target.clone(),
                }));
            }
            return Err(execution(ExecutionError::NonZeroExit {
                status,
                stderr: err,
            }));
        }

        Ok(out)
    }
}

impl Sampler for JstatSampler {
    async fn sample(&self, mode: ReportMode) -> Result<Sample, SampleError> {
        debug!(
            tool = %self.tool.display(),
            flag = mode.flag(),
            target = %self.target,
            "invoking jstat"
        );
        let output = self.run(mode).await?;
        Ok(Sample::new(mode, output))
    }
}
