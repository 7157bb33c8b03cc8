//! Uploaded payload models.

use bytes::Bytes;

use crate::category::Category;
use crate::signature::ContentSignature;

/// An uploaded file as received from the transport layer.
///
/// Immutable value owned by the request that created it. The declared
/// filename and MIME type are untrusted client metadata and never drive
/// validation decisions (with the single, narrow text/plain exception the
/// validator owns).
#[derive(Debug, Clone)]
pub struct UploadedPayload {
    /// Raw file content.
    pub data: Bytes,
    /// Client-declared original filename. Diagnostic only.
    pub file_name: String,
    /// Client-declared MIME type. Untrusted.
    pub declared_mime: String,
}

impl UploadedPayload {
    /// Create a payload from its parts.
    pub fn new(
        data: impl Into<Bytes>,
        file_name: impl Into<String>,
        declared_mime: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
            declared_mime: declared_mime.into(),
        }
    }

    /// Payload size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A payload that has passed every validation gate.
///
/// Only the validator constructs this; holding one is proof the content
/// was sniffed, allowlisted, and matched against its declared category.
#[derive(Debug, Clone)]
pub struct ValidatedPayload {
    /// The original payload.
    pub payload: UploadedPayload,
    /// The sniffer's verdict.
    pub signature: ContentSignature,
    /// The declared (and now verified) category.
    pub category: Category,
}

impl ValidatedPayload {
    /// The content type conversion should treat this payload as.
    ///
    /// The detected signature wins; `text/plain` appears only via the
    /// validator's unknown-signature exception path.
    pub fn effective_mime(&self) -> &str {
        match self.signature.as_mime() {
            Some(mime) => mime,
            None => "text/plain",
        }
    }

    /// Staging-file extension derived from the validated content type.
    pub fn staging_extension(&self) -> &'static str {
        ContentSignature::extension_for(self.effective_mime()).unwrap_or("bin")
    }
}
