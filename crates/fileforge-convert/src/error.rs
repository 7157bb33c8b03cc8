//! Error type for the conversion orchestration pipeline.
//!
//! Display text never contains staging paths or other server-internal
//! identifiers; it may be surfaced to callers. Paths go to tracing only.

use thiserror::Error;

use fileforge_entity::FailureKind;

/// Errors produced while orchestrating a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Staging or artifact I/O failed.
    #[error("I/O failure while staging the upload: {0}")]
    Io(#[from] std::io::Error),

    /// The converter exited with a non-zero status.
    #[error("Converter exited with code {code}: {diagnostics}")]
    NonZeroExit {
        /// The exit code.
        code: i32,
        /// Captured stderr output, trimmed.
        diagnostics: String,
    },

    /// The converter failed to launch, was killed by a signal, or
    /// reported success without producing output.
    #[error("Converter crashed: {detail}")]
    Crashed {
        /// What went wrong.
        detail: String,
    },

    /// The converter exceeded the wall-clock timeout and was killed.
    #[error("Converter timed out after {timeout_seconds}s")]
    TimedOut {
        /// The timeout that was exceeded.
        timeout_seconds: u64,
    },

    /// The surrounding request was cancelled and the converter killed.
    #[error("Conversion was cancelled")]
    Cancelled,
}

impl ConvertError {
    /// Classify this error for the conversion outcome state machine.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Io(_) => FailureKind::IoError,
            Self::NonZeroExit { .. } => FailureKind::ConverterNonZeroExit,
            Self::Crashed { .. } => FailureKind::ConverterCrashed,
            Self::TimedOut { .. } => FailureKind::ConverterTimedOut,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }
}
