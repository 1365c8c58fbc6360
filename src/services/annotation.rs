//! Annotation string parsing.
//!
//! A search result carries a free-text line such as
//! `"✅ English [en] · EPUB · 0.7MB · 2015 · 📘 Book (fiction)"`. Records with
//! several languages list each one as its own segment, so format and size are
//! located relative to the first segment carrying a size unit rather than by
//! fixed position.

/// Segment delimiter used by the catalog.
const DELIMITER: &str = " · ";

/// Units that mark the size segment.
const SIZE_UNITS: [&str; 3] = ["MB", "KB", "GB"];

/// Decoration that may precede the language name.
const LANGUAGE_DECORATION: [char; 2] = ['✅', ' '];

/// Metadata fields recovered from an annotation string.
///
/// Any field may be empty when the annotation does not have the expected
/// shape. That is a degraded parse, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub language: String,
    pub format: String,
    pub size: String,
}

/// Parse an annotation string into language, format and size.
pub fn parse_annotation(raw: &str) -> Annotation {
    let parts: Vec<&str> = raw.split(DELIMITER).collect();
    if parts.len() < 3 {
        return Annotation::default();
    }

    let mut annotation = Annotation {
        language: parse_language(parts[0]),
        ..Annotation::default()
    };

    if let Some(size_idx) = (1..parts.len()).find(|&i| is_size(parts[i])) {
        annotation.size = parts[size_idx].trim().to_string();
        // The segment at index 0 is the language, never the format.
        if size_idx > 1 {
            annotation.format = parts[size_idx - 1].trim().to_string();
        }
    }

    annotation
}

fn parse_language(segment: &str) -> String {
    let segment = segment.trim();
    match segment.find('[') {
        Some(idx) if idx > 0 => segment[..idx]
            .trim()
            .trim_start_matches(LANGUAGE_DECORATION)
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

fn is_size(segment: &str) -> bool {
    SIZE_UNITS.iter().any(|unit| segment.contains(unit))
}
