//! The externally-visible error taxonomy.
//!
//! Component errors fold into a single shape here. Client-fault errors
//! carry specific, human-readable messages; server-fault errors may carry
//! converter diagnostics but never staging paths or other internal
//! identifiers.

use thiserror::Error;

use fileforge_convert::ConvertError;
use fileforge_core::error::AppError;
use fileforge_entity::Category;
use fileforge_service::ValidationError;

/// Every way a conversion request can fail, as seen by callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required request parameter was empty or absent.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// The parameter name.
        name: &'static str,
    },

    /// The declared category name is not a known category.
    #[error("Unknown category: '{name}'")]
    UnknownCategory {
        /// The name that was declared.
        name: String,
    },

    /// The sniffed content is not in the allowlist.
    #[error("Unsupported file type: detected '{detected}'")]
    UnsupportedType {
        /// The sniffed signature ("unknown" when nothing matched).
        detected: String,
    },

    /// The payload exceeds the configured size limit.
    #[error("File is too large: {size_bytes} bytes exceeds the limit of {limit_bytes} bytes")]
    TooLarge {
        /// Actual payload size.
        size_bytes: u64,
        /// Configured maximum.
        limit_bytes: u64,
    },

    /// The sniffed content does not belong to the declared category.
    #[error(
        "Content does not match category: detected '{detected}' but category '{category}' was declared"
    )]
    CategoryMismatch {
        /// The sniffed (or effective) content type.
        detected: String,
        /// The declared category.
        category: Category,
    },

    /// Staging or artifact I/O failed.
    #[error("I/O failure while preparing the conversion: {detail}")]
    Io {
        /// What failed, without internal paths.
        detail: String,
    },

    /// The converter exited with a non-zero status.
    #[error("Converter exited with code {code}: {diagnostics}")]
    ConverterNonZeroExit {
        /// The exit code.
        code: i32,
        /// Captured converter diagnostics.
        diagnostics: String,
    },

    /// The converter failed to launch, was killed, or lied about success.
    #[error("Converter crashed: {detail}")]
    ConverterCrashed {
        /// What went wrong.
        detail: String,
    },

    /// The converter exceeded the wall-clock timeout.
    #[error("Converter timed out after {timeout_seconds}s")]
    ConverterTimedOut {
        /// The timeout that was exceeded.
        timeout_seconds: u64,
    },

    /// The request was cancelled mid-flight.
    #[error("Conversion was cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Whether the error is attributable to the caller's input
    /// (the "bad request" class) rather than the server or converter.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::UnknownCategory { .. }
                | Self::UnsupportedType { .. }
                | Self::TooLarge { .. }
                | Self::CategoryMismatch { .. }
        )
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooLarge {
                size_bytes,
                limit_bytes,
            } => Self::TooLarge {
                size_bytes,
                limit_bytes,
            },
            ValidationError::UnsupportedType { detected } => Self::UnsupportedType { detected },
            ValidationError::UnknownCategory { name } => Self::UnknownCategory { name },
            ValidationError::CategoryMismatch { detected, category } => Self::CategoryMismatch {
                detected,
                category,
            },
        }
    }
}

impl From<ConvertError> for GatewayError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Io(e) => Self::Io {
                detail: e.to_string(),
            },
            ConvertError::NonZeroExit { code, diagnostics } => Self::ConverterNonZeroExit {
                code,
                diagnostics,
            },
            ConvertError::Crashed { detail } => Self::ConverterCrashed { detail },
            ConvertError::TimedOut { timeout_seconds } => Self::ConverterTimedOut {
                timeout_seconds,
            },
            ConvertError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match &err {
            _ if err.is_client_fault() => AppError::validation(err.to_string()),
            GatewayError::Io { .. } => AppError::storage(err.to_string()),
            GatewayError::Cancelled => AppError::conflict(err.to_string()),
            _ => AppError::external_service(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fileforge_core::error::ErrorKind;

    #[test]
    fn test_client_fault_partition() {
        assert!(GatewayError::MissingParameter { name: "category" }.is_client_fault());
        assert!(
            GatewayError::CategoryMismatch {
                detected: "image/png".into(),
                category: Category::Document,
            }
            .is_client_fault()
        );
        assert!(!GatewayError::Cancelled.is_client_fault());
        assert!(
            !GatewayError::ConverterNonZeroExit {
                code: 1,
                diagnostics: String::new(),
            }
            .is_client_fault()
        );
    }

    #[test]
    fn test_validation_errors_fold() {
        let err: GatewayError = ValidationError::UnknownCategory {
            name: "archive".into(),
        }
        .into();
        assert!(matches!(err, GatewayError::UnknownCategory { ref name } if name == "archive"));
    }

    #[test]
    fn test_convert_errors_fold() {
        let err: GatewayError = ConvertError::TimedOut { timeout_seconds: 60 }.into();
        assert!(matches!(err, GatewayError::ConverterTimedOut { timeout_seconds: 60 }));
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = GatewayError::TooLarge {
            size_bytes: 100,
            limit_bytes: 10,
        }
        .into();
        assert_eq!(app.kind, ErrorKind::Validation);

        let app: AppError = GatewayError::ConverterCrashed {
            detail: "boom".into(),
        }
        .into();
        assert_eq!(app.kind, ErrorKind::ExternalService);

        let app: AppError = GatewayError::Cancelled.into();
        assert_eq!(app.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_mismatch_message_names_both_sides() {
        let message = GatewayError::CategoryMismatch {
            detected: "image/png".into(),
            category: Category::Document,
        }
        .to_string();
        assert!(message.contains("image/png"));
        assert!(message.contains("document"));
    }
}
