//! Category policy: which content signatures a category accepts.

use fileforge_entity::Category;

/// Validates a sniffed signature against a declared category.
///
/// The category → prefix table is fixed at compile time on the
/// [`Category`] enum; this type is the single place that applies it.
pub struct CategoryPolicy;

impl CategoryPolicy {
    /// Whether `mime` is acceptable for `category`.
    ///
    /// A signature matches if it starts with any of the category's
    /// prefixes — prefix match, not equality, so one entry covers a
    /// whole MIME subtype family.
    pub fn is_acceptable(mime: &str, category: Category) -> bool {
        category
            .signature_prefixes()
            .iter()
            .any(|prefix| mime.starts_with(prefix))
    }

    /// The acceptable signature prefixes for a category.
    pub fn prefixes_for(category: Category) -> &'static [&'static str] {
        category.signature_prefixes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_category() {
        assert!(CategoryPolicy::is_acceptable("image/png", Category::Image));
        assert!(CategoryPolicy::is_acceptable("image/webp", Category::Image));
        assert!(!CategoryPolicy::is_acceptable("video/mp4", Category::Image));
    }

    #[test]
    fn test_document_category_families() {
        assert!(CategoryPolicy::is_acceptable("application/pdf", Category::Document));
        assert!(CategoryPolicy::is_acceptable("text/plain", Category::Document));
        assert!(CategoryPolicy::is_acceptable("application/msword", Category::Document));
        // Prefix semantics: the whole vnd.* family is acceptable
        assert!(CategoryPolicy::is_acceptable(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Category::Document
        ));
        assert!(!CategoryPolicy::is_acceptable("image/png", Category::Document));
    }

    #[test]
    fn test_audio_and_video() {
        assert!(CategoryPolicy::is_acceptable("audio/flac", Category::Audio));
        assert!(!CategoryPolicy::is_acceptable("audio/flac", Category::Video));
        assert!(CategoryPolicy::is_acceptable("video/x-matroska", Category::Video));
        assert!(!CategoryPolicy::is_acceptable("video/x-matroska", Category::Audio));
    }

    #[test]
    fn test_verdicts_are_independent_per_category() {
        // Each category's verdict depends only on its own row of the table
        for category in Category::ALL {
            let verdict = CategoryPolicy::is_acceptable("image/png", *category);
            assert_eq!(verdict, matches!(category, Category::Image));
        }
    }

    #[test]
    fn test_prefixes_exposed() {
        assert_eq!(CategoryPolicy::prefixes_for(Category::Audio), &["audio/"]);
        assert_eq!(CategoryPolicy::prefixes_for(Category::Document).len(), 4);
    }
}
