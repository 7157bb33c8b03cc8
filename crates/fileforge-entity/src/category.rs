//! Upload category enumeration and its acceptable-signature table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category name supplied by a client did not match any known category.
#[derive(Debug, Clone, Error)]
#[error("unknown category: '{name}'")]
pub struct UnknownCategoryError {
    /// The name that was supplied.
    pub name: String,
}

/// Logical bucket a client asserts an upload belongs to.
///
/// The set is closed: external input enters through [`FromStr`] exactly
/// once, and everywhere else an unknown category is a compile-time
/// impossibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Raster images.
    Image,
    /// Video containers.
    Video,
    /// Audio containers.
    Audio,
    /// Documents (PDF, plain text, office formats).
    Document,
}

impl Category {
    /// All categories, for iteration in tests and diagnostics.
    pub const ALL: &'static [Category] = &[
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Document,
    ];

    /// Signature prefixes acceptable for this category.
    ///
    /// Prefix semantics (not exact equality) are deliberate: one entry
    /// covers a whole MIME subtype family.
    pub fn signature_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Image => &["image/"],
            Self::Video => &["video/"],
            Self::Audio => &["audio/"],
            Self::Document => &[
                "application/pdf",
                "text/",
                "application/vnd",
                "application/msword",
            ],
        }
    }

    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "document" => Ok(Self::Document),
            other => Err(UnknownCategoryError {
                name: other.to_string(),
            }),
        }
    }
}
