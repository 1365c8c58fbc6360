// src/utils/url.rs

//! URL manipulation utilities.

use url::{Url, form_urlencoded};

/// Percent-encode a value for use inside a query string.
///
/// Spaces become `+`, matching HTML form encoding.
///
/// # Examples
/// ```
/// use bookfetch::utils::url::encode_query_value;
///
/// assert_eq!(encode_query_value("dune messiah"), "dune+messiah");
/// ```
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Replace `{name}` placeholders with encoded values.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), &encode_query_value(value))
    })
}

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
