//! Upload validation configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upload validation configuration.
///
/// The allowlist names the canonical MIME signatures the sniffer may
/// accept. Declared client metadata never widens it.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    #[validate(range(min = 1))]
    pub max_upload_size_bytes: u64,

    /// Canonical MIME signatures accepted for conversion.
    #[serde(default = "default_allowed_signatures")]
    pub allowed_signatures: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload_size(),
            allowed_signatures: default_allowed_signatures(),
        }
    }
}

impl UploadConfig {
    /// Whether a sniffed signature is in the allowlist.
    pub fn is_allowed(&self, mime: &str) -> bool {
        self.allowed_signatures.iter().any(|s| s == mime)
    }
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}

fn default_allowed_signatures() -> Vec<String> {
    [
        "image/jpeg",
        "image/png",
        "image/webp",
        "image/gif",
        "audio/mpeg",
        "audio/wav",
        "audio/ogg",
        "audio/flac",
        "video/mp4",
        "video/x-matroska",
        "video/quicktime",
        "video/x-msvideo",
        "application/pdf",
        "text/plain",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_is_50_mib() {
        let config = UploadConfig::default();
        assert_eq!(config.max_upload_size_bytes, 52_428_800);
    }

    #[test]
    fn test_allowlist_membership() {
        let config = UploadConfig::default();
        assert!(config.is_allowed("image/png"));
        assert!(config.is_allowed("text/plain"));
        assert!(!config.is_allowed("application/zip"));
        assert!(!config.is_allowed("application/x-msdownload"));
    }

    #[test]
    fn test_allowlist_is_exact_not_prefix() {
        let config = UploadConfig::default();
        // Prefix matching belongs to the category policy, not the allowlist
        assert!(!config.is_allowed("image/"));
        assert!(!config.is_allowed("image/png2"));
    }
}
