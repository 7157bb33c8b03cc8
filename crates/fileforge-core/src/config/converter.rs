//! Configuration for the external converter subsystem.
//!
//! The converter is an executable invoked as
//! `<converter> <staging-file-path> <target-format>`. It may be configured
//! with an explicit path, or with a bare program name resolved against the
//! system PATH.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::AppError;

/// Configuration for the external converter process.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Path to the converter executable.
    ///
    /// A bare program name (no path separator) is resolved against PATH.
    /// Empty means not configured, which is a startup error.
    #[serde(default)]
    pub path: PathBuf,

    /// Root directory for staging files. Defaults to a dedicated
    /// directory under the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Wall-clock timeout in seconds for a single converter invocation.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 7200))]
    pub timeout_seconds: u64,

    /// Global limit for concurrent converter processes (CPU/RAM bound).
    #[serde(default = "default_max_concurrent_conversions")]
    #[validate(range(min = 1, max = 16))]
    pub max_concurrent_conversions: usize,

    /// Whether to capture converter stdout/stderr for diagnostics.
    #[serde(default = "default_capture_output")]
    pub capture_output: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            staging_dir: None,
            timeout_seconds: default_timeout_seconds(),
            max_concurrent_conversions: default_max_concurrent_conversions(),
            capture_output: default_capture_output(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_max_concurrent_conversions() -> usize {
    4
}

fn default_capture_output() -> bool {
    true
}

impl ConverterConfig {
    /// Resolve the effective staging root directory.
    pub fn effective_staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("fileforge-staging"))
    }

    /// Resolve the converter executable to an existing path.
    ///
    /// An explicit path must exist; a bare program name is searched on the
    /// system PATH. This method should be called once during startup.
    pub fn resolve_converter_path(&self) -> Result<PathBuf, AppError> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::configuration(
                "converter.path is not configured",
            ));
        }

        if self.path.components().count() > 1 {
            if self.path.is_file() {
                info!(path = %self.path.display(), "Using configured converter path");
                return Ok(self.path.clone());
            }
            return Err(AppError::configuration(format!(
                "Converter executable not found: {}",
                self.path.display()
            )));
        }

        let path_var = std::env::var("PATH").unwrap_or_default();
        Self::search_path(&self.path, &path_var).ok_or_else(|| {
            AppError::configuration(format!(
                "Converter '{}' not found on PATH",
                self.path.display()
            ))
        })
    }

    /// Search a PATH-style variable for a program name.
    fn search_path(program: &Path, path_var: &str) -> Option<PathBuf> {
        #[cfg(windows)]
        let separator = ';';
        #[cfg(not(windows))]
        let separator = ':';

        for dir in path_var.split(separator).filter(|d| !d.is_empty()) {
            let candidate = PathBuf::from(dir).join(program);
            if candidate.is_file() {
                info!(path = %candidate.display(), "Found converter on PATH");
                return Some(candidate);
            }
        }
        None
    }
}
