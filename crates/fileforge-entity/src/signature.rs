//! Content signatures: the MIME type inferred from a file's actual bytes.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Signature → staging extension map macro
// ---------------------------------------------------------------------------

macro_rules! define_signatures {
    ($($mime:literal => $ext:literal),* $(,)?) => {
        static EXTENSION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
            LazyLock::new(|| HashMap::from([$(($mime, $ext),)*]));

        impl ContentSignature {
            /// All canonical MIME strings the sniffer can produce.
            pub const KNOWN_MIMES: &'static [&'static str] = &[$($mime,)*];
        }
    };
}

define_signatures! {
    "image/png"       => "png",
    "image/jpeg"      => "jpg",
    "image/webp"      => "webp",
    "image/gif"       => "gif",
    "image/tiff"      => "tif",
    "audio/mpeg"      => "mp3",
    "audio/wav"       => "wav",
    "audio/ogg"       => "ogg",
    "audio/flac"      => "flac",
    "video/mp4"       => "mp4",
    "video/quicktime" => "mov",
    "video/x-matroska" => "mkv",
    "video/x-msvideo" => "avi",
    "application/pdf" => "pdf",
    "application/msword" => "doc",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
    "application/zip" => "zip",
    "text/plain"      => "txt",
}

/// The content type inferred from a file's bytes, independent of any
/// client-supplied filename or declared MIME type.
///
/// `Known` always carries one of [`ContentSignature::KNOWN_MIMES`]; the
/// sniffer returns `Unknown` rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentSignature {
    /// Canonical MIME string detected from magic bytes.
    Known(&'static str),
    /// No recognized signature (plain text typically lands here).
    Unknown,
}

impl ContentSignature {
    /// Whether a signature was detected.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The detected MIME string, if any.
    pub fn as_mime(&self) -> Option<&'static str> {
        match self {
            Self::Known(mime) => Some(mime),
            Self::Unknown => None,
        }
    }

    /// Safe staging-file extension for a canonical MIME string.
    ///
    /// Never derived from a client filename.
    pub fn extension_for(mime: &str) -> Option<&'static str> {
        EXTENSION_MAP.get(mime).copied()
    }
}

impl fmt::Display for ContentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(mime) => write!(f, "{mime}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
