//! Upload validation: the gate every payload passes before conversion.

use thiserror::Error;
use tracing::debug;

use fileforge_core::config::upload::UploadConfig;
use fileforge_entity::{Category, ContentSignature, UploadedPayload, ValidatedPayload};

use crate::policy::CategoryPolicy;
use crate::sniffer::ContentSniffer;

/// The one declared MIME type the validator is allowed to trust, and only
/// when the sniffer found nothing at all.
const TEXT_PLAIN: &str = "text/plain";

/// Rejection reasons produced by [`UploadValidator`].
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// The payload exceeds the configured size limit.
    #[error("File is too large: {size_bytes} bytes exceeds the limit of {limit_bytes} bytes")]
    TooLarge {
        /// Actual payload size.
        size_bytes: u64,
        /// Configured maximum.
        limit_bytes: u64,
    },

    /// The sniffed content is not in the allowlist.
    #[error("Unsupported file type: detected '{detected}'")]
    UnsupportedType {
        /// The sniffed signature ("unknown" when nothing matched).
        detected: String,
    },

    /// The declared category name is not a known category.
    #[error("Unknown category: '{name}'")]
    UnknownCategory {
        /// The name that was declared.
        name: String,
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
}

/// Composes the sniffer, the category policy, and the size/allowlist
/// checks into one gate.
///
/// Validation is pure with respect to the payload: no disk writes, and
/// re-validating the same payload always yields the same verdict.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    config: UploadConfig,
}

impl UploadValidator {
    /// Create a validator with the given upload configuration.
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Validate a payload against its declared category.
    ///
    /// Gates run in order and the first failure short-circuits:
    /// size → sniff + allowlist → category resolution → category match.
    pub fn validate(
        &self,
        payload: UploadedPayload,
        declared_category: &str,
    ) -> Result<ValidatedPayload, ValidationError> {
        if payload.size_bytes() > self.config.max_upload_size_bytes {
            return Err(ValidationError::TooLarge {
                size_bytes: payload.size_bytes(),
                limit_bytes: self.config.max_upload_size_bytes,
            });
        }

        let signature = ContentSniffer::sniff(&payload.data);
        let allowed = match signature.as_mime() {
            Some(mime) => self.config.is_allowed(mime),
            // Plain text has no magic bytes. Trust the declared type for
            // exactly this case and nothing broader.
            None => payload.declared_mime == TEXT_PLAIN,
        };
        if !allowed {
            return Err(ValidationError::UnsupportedType {
                detected: signature.to_string(),
            });
        }

        let category: Category =
            declared_category
                .parse()
                .map_err(|e: fileforge_entity::UnknownCategoryError| {
                    ValidationError::UnknownCategory { name: e.name }
                })?;

        let effective_mime = signature.as_mime().unwrap_or(TEXT_PLAIN);
        if !CategoryPolicy::is_acceptable(effective_mime, category) {
            return Err(ValidationError::CategoryMismatch {
                detected: effective_mime.to_string(),
                category,
            });
        }

        debug!(
            signature = %signature,
            category = %category,
            size_bytes = payload.size_bytes(),
            "Upload validated"
        );

        Ok(ValidatedPayload {
            payload,
            signature,
            category,
        })
    }
}
