//! Converter process execution.
//!
//! Spawns the external converter as an isolated child process and races
//! its exit against the wall-clock timeout and request cancellation. Both
//! output streams are drained on dedicated tasks *while the process
//! runs* — a converter that floods stderr must not deadlock on a full
//! pipe, and diagnostics must not buffer unboundedly inside the child.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::ConvertError;

/// Runs the external converter: `<converter> <input-path> <target-format>`.
///
/// Contract with the converter: on success it prints the artifact path to
/// stdout and exits 0; on failure it prints a diagnostic to stderr and
/// exits non-zero. It must not require interactive input and must be
/// safely killable mid-run.
#[derive(Debug, Clone)]
pub struct ConverterRunner {
    converter_path: PathBuf,
    timeout: Duration,
    capture_diagnostics: bool,
}

impl ConverterRunner {
    /// Create a runner for a resolved converter executable.
    pub fn new(converter_path: PathBuf, timeout: Duration, capture_diagnostics: bool) -> Self {
        Self {
            converter_path,
            timeout,
            capture_diagnostics,
        }
    }

    /// Run one conversion and return the converter's trimmed stdout.
    ///
    /// The returned string is the path the converter claims to have
    /// written; the caller verifies it exists.
    pub async fn run(
        &self,
        input: &Path,
        target_format: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ConvertError> {
        let stderr_cfg = if self.capture_diagnostics {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut cmd = Command::new(&self.converter_path);
        cmd.arg(input)
            .arg(target_format)
            .stdin(Stdio::null())
            // stdout carries the artifact path; always captured
            .stdout(Stdio::piped())
            .stderr(stderr_cfg)
            .kill_on_drop(true);

        debug!(
            converter = %self.converter_path.display(),
            input = %input.display(),
            target_format,
            timeout_s = self.timeout.as_secs(),
            "Spawning converter process"
        );

        let start = Instant::now();

        let mut child = cmd.spawn().map_err(|e| ConvertError::Crashed {
            detail: format!("failed to launch converter: {e}"),
        })?;

        // Drain both pipes concurrently with the running process
        let stdout_task = Self::drain_stream(child.stdout.take());
        let stderr_task = Self::drain_stream(child.stderr.take());

        tokio::select! {
            result = child.wait() => {
                let status = result.map_err(|e| ConvertError::Crashed {
                    detail: format!("failed to reap converter: {e}"),
                })?;
                let stdout = Self::finish_stream(stdout_task).await;
                let stderr = Self::finish_stream(stderr_task).await;
                let elapsed = start.elapsed();

                if status.success() {
                    info!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Converter completed"
                    );
                    return Ok(stdout.trim().to_string());
                }

                match status.code() {
                    Some(code) => {
                        error!(
                            code,
                            elapsed_ms = elapsed.as_millis() as u64,
                            stderr = %stderr,
                            "Converter failed"
                        );
                        Err(ConvertError::NonZeroExit {
                            code,
                            diagnostics: stderr.trim().to_string(),
                        })
                    }
                    None => {
                        error!(
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Converter was killed by a signal"
                        );
                        Err(ConvertError::Crashed {
                            detail: "converter was terminated by a signal".to_string(),
                        })
                    }
                }
            }
            _ = tokio::time::sleep(self.timeout) => {
                error!(
                    timeout_s = self.timeout.as_secs(),
                    "Converter timed out, killing"
                );
                Self::kill(&mut child).await;
                Err(ConvertError::TimedOut {
                    timeout_seconds: self.timeout.as_secs(),
                })
            }
            _ = cancel.cancelled() => {
                info!("Request cancelled, killing converter process");
                Self::kill(&mut child).await;
                Err(ConvertError::Cancelled)
            }
        }
    }

    /// Spawn a task that consumes a pipe to completion.
    fn drain_stream<R>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>>
    where
        R: tokio::io::AsyncRead + Unpin + Send + 'static,
    {
        stream.map(|mut s| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = s.read_to_end(&mut buf).await;
                buf
            })
        })
    }

    /// Collect a drained stream as lossy UTF-8.
    async fn finish_stream(task: Option<JoinHandle<Vec<u8>>>) -> String {
        match task {
            Some(handle) => match handle.await {
                Ok(buf) => String::from_utf8_lossy(&buf).to_string(),
                Err(_) => String::new(),
            },
            None => String::new(),
        }
    }

    /// Kill the child, reaping it so no zombie is left behind.
    async fn kill(child: &mut Child) {
        if let Err(e) = child.kill().await {
            debug!(error = %e, "Converter already exited during kill");
        }
    }
}
