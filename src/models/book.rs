//! Book record data structure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A catalog entry located by a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct BookRecord {
    /// Book title
    pub title: String,

    /// Author list as rendered by the catalog (may be empty)
    pub authors: String,

    /// Publisher line (may be empty)
    pub publisher: String,

    /// Language name without its code (may be empty)
    pub language: String,

    /// File format, e.g. "EPUB" (may be empty)
    pub format: String,

    /// Human readable file size, e.g. "0.7MB" (may be empty)
    pub size: String,

    /// Absolute URL of the record's detail page
    #[serde(rename = "URL")]
    pub url: String,

    /// Record identifier used as the download key
    pub hash: String,
}

impl BookRecord {
    /// Serialize the record as indented JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Authors: {}", self.authors)?;
        writeln!(f, "Publisher: {}", self.publisher)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "URL: {}", self.url)?;
        write!(f, "Hash: {}", self.hash)
    }
}

/// What the download resolver needs to fetch one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub hash: String,
    pub title: String,
    pub format: String,
}

impl DownloadRequest {
    pub fn new(
        hash: impl Into<String>,
        title: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            title: title.into(),
            format: format.into(),
        }
    }

    /// Target file name: `{title}.{format}` with path separators replaced.
    ///
    /// A name made only of dots would name a directory, so it becomes `_`.
    pub fn file_name(&self) -> String {
        let name = format!("{}.{}", self.title, self.format).replace(['/', '\\'], "_");
        if name.chars().all(|c| c == '.') {
            return "_".to_string();
        }
        name
    }
}

impl From<&BookRecord> for DownloadRequest {
    fn from(book: &BookRecord) -> Self {
        Self::new(&book.hash, &book.title, &book.format)
    }
}
