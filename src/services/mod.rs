//! Service layer for bookfetch.
//!
//! This module contains the business logic for:
//! - Annotation parsing (`parse_annotation`)
//! - Result page scraping (`PageScraper`, `HtmlPageScraper`)
//! - Record extraction (`RecordExtractor`)
//! - Searching the catalog (`BookSearcher`)
//! - Downloading books (`DownloadResolver`)

mod annotation;
mod download;
mod extractor;
mod scrape;
mod search;

pub use annotation::{Annotation, parse_annotation};
pub use download::DownloadResolver;
pub use extractor::RecordExtractor;
pub use scrape::{HtmlPageScraper, PageScraper, RawFragment};
pub use search::BookSearcher;
