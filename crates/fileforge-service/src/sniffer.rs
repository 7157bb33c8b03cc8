//! Content sniffing from magic bytes.
//!
//! Magic bytes don't lie — extensions and declared MIME types can be
//! wrong. The sniffer inspects only the buffer it is given: no I/O, no
//! client metadata, fully deterministic.

use fileforge_entity::ContentSignature;

/// How many bytes of the head/tail to scan for ZIP entry names.
const ZIP_SCAN_WINDOW: usize = 4096;

/// Inspects raw file bytes and returns a best-known content signature.
pub struct ContentSniffer;

impl ContentSniffer {
    /// Sniff a buffer's content signature.
    ///
    /// Returns [`ContentSignature::Unknown`] when no signature matches;
    /// plain text always lands there (it has no magic bytes), and the
    /// validator owns that special case.
    pub fn sniff(bytes: &[u8]) -> ContentSignature {
        let mime = match bytes {
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
            // TIFF: little-endian (II*\0) or big-endian (MM\0*)
            [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => "image/tiff",
            [b'R', b'I', b'F', b'F', ..] if bytes.len() >= 12 => match &bytes[8..12] {
                b"WEBP" => "image/webp",
                b"WAVE" => "audio/wav",
                b"AVI " => "video/x-msvideo",
                _ => return ContentSignature::Unknown,
            },
            [b'O', b'g', b'g', b'S', ..] => "audio/ogg",
            [b'f', b'L', b'a', b'C', ..] => "audio/flac",
            [b'I', b'D', b'3', ..] => "audio/mpeg",
            // Bare MPEG audio frame: sync bits set, layer bits valid
            [0xFF, b1, ..] if b1 & 0xE0 == 0xE0 && b1 & 0x06 != 0 => "audio/mpeg",
            // EBML container (Matroska and WebM share it)
            [0x1A, 0x45, 0xDF, 0xA3, ..] => "video/x-matroska",
            [b'%', b'P', b'D', b'F', ..] => "application/pdf",
            // OLE2 compound document (legacy Word)
            [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, ..] => "application/msword",
            [b'P', b'K', 0x03, 0x04, ..] => {
                if Self::zip_names_word_entries(bytes) {
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                } else {
                    "application/zip"
                }
            }
            // ISO base media: "ftyp" at offset 4, major brand at 8
            _ if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" => {
                if bytes[8..12].starts_with(b"qt") {
                    "video/quicktime"
                } else {
                    "video/mp4"
                }
            }
            _ => return ContentSignature::Unknown,
        };

        ContentSignature::Known(mime)
    }

    /// Whether a ZIP container's entry tables name a `word/` entry.
    ///
    /// Entry names appear in local headers near the head and in the
    /// central directory at the tail; scanning both windows identifies
    /// OOXML word documents without unpacking the archive.
    fn zip_names_word_entries(bytes: &[u8]) -> bool {
        let head = &bytes[..bytes.len().min(ZIP_SCAN_WINDOW)];
        let tail = &bytes[bytes.len().saturating_sub(ZIP_SCAN_WINDOW)..];
        contains(head, b"word/") || contains(tail, b"word/")
    }
}

/// Subslice search.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
