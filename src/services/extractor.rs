//! Record extraction.
//!
//! Turns scraped fragments into [`BookRecord`]s.

use url::Url;

use crate::models::BookRecord;
use crate::services::annotation::parse_annotation;
use crate::services::scrape::RawFragment;
use crate::utils::resolve_url;

/// Builds book records from raw fragments.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    path_prefix: String,
}

impl RecordExtractor {
    /// Create an extractor for detail links starting with `path_prefix`.
    pub fn new(path_prefix: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
        }
    }

    /// Build a record, or `None` when the fragment has no usable identifier.
    pub fn extract(&self, fragment: RawFragment, base: &Url) -> Option<BookRecord> {
        let hash = fragment.href.trim().strip_prefix(&self.path_prefix)?.trim();
        if hash.is_empty() {
            return None;
        }

        let annotation = parse_annotation(&fragment.annotation);

        Some(BookRecord {
            title: fragment.title.trim().to_string(),
            authors: fragment.authors.trim().to_string(),
            publisher: fragment.publisher.trim().to_string(),
            language: annotation.language,
            format: annotation.format,
            size: annotation.size,
            url: resolve_url(base, &fragment.href),
            hash: hash.to_string(),
        })
    }
}
