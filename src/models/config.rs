//! Application configuration structures.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::fill_template;

/// Environment variable holding the fast download API key.
pub const SECRET_KEY_ENV: &str = "ANNAS_SECRET_KEY";

/// Environment variable holding the download directory.
pub const DOWNLOAD_PATH_ENV: &str = "ANNAS_DOWNLOAD_PATH";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Catalog endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Markup contract of the search result page
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `ANNAS_SECRET_KEY` and `ANNAS_DOWNLOAD_PATH` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(SECRET_KEY_ENV).ok(),
            std::env::var(DOWNLOAD_PATH_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, secret_key: Option<String>, directory: Option<String>) {
        if let Some(key) = secret_key.filter(|k| !k.trim().is_empty()) {
            self.download.secret_key = Some(key);
        }
        if let Some(dir) = directory.filter(|d| !d.trim().is_empty()) {
            self.download.directory = dir;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Url::parse(&self.endpoints.base_url)
            .map_err(|e| AppError::validation(format!("endpoints.base_url: {e}")))?;
        if !self.endpoints.search_path.contains("{query}") {
            return Err(AppError::validation(
                "endpoints.search_path must contain {query}",
            ));
        }
        if !self.endpoints.download_api_path.contains("{hash}")
            || !self.endpoints.download_api_path.contains("{key}")
        {
            return Err(AppError::validation(
                "endpoints.download_api_path must contain {hash} and {key}",
            ));
        }
        if self.selectors.record_path_prefix.is_empty() {
            return Err(AppError::validation(
                "selectors.record_path_prefix is empty",
            ));
        }
        for selector in self.selectors.css_selectors() {
            Selector::parse(selector)
                .map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Catalog endpoints. Paths are joined onto `base_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Search page path, `{query}` is replaced with the encoded query
    #[serde(default = "defaults::search_path")]
    pub search_path: String,

    /// Fast download API path with `{hash}` and `{key}` placeholders
    #[serde(default = "defaults::download_api_path")]
    pub download_api_path: String,
}

impl EndpointConfig {
    /// Endpoints rooted at another mirror or a local test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Search page URL for a query.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        self.join(&fill_template(&self.search_path, &[("query", query)]))
    }

    /// Fast download API URL for a record hash and access key.
    pub fn download_api_url(&self, hash: &str, key: &str) -> Result<Url> {
        self.join(&fill_template(
            &self.download_api_path,
            &[("hash", hash), ("key", key)],
        ))
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?.join(path)?)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            search_path: defaults::search_path(),
            download_api_path: defaults::download_api_path(),
        }
    }
}

/// CSS selectors describing a search result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Anchors linking to a record detail page
    #[serde(default = "defaults::record_anchor")]
    pub record_anchor: String,

    /// Exact `class` attribute of the anchor treated as the record root
    #[serde(default = "defaults::primary_anchor_class")]
    pub primary_anchor_class: String,

    /// Container (under the anchor's parent) holding the record text
    #[serde(default = "defaults::info_container")]
    pub info_container: String,

    #[serde(default = "defaults::title")]
    pub title: String,

    /// Icon span whose parent link carries the authors
    #[serde(default = "defaults::author_icon")]
    pub author_icon: String,

    /// Icon span whose parent link carries the publisher
    #[serde(default = "defaults::publisher_icon")]
    pub publisher_icon: String,

    /// Element holding the annotation string
    #[serde(default = "defaults::annotation")]
    pub annotation: String,

    /// Path prefix stripped from the anchor href to obtain the hash
    #[serde(default = "defaults::record_path_prefix")]
    pub record_path_prefix: String,
}

impl SelectorConfig {
    /// All fields holding CSS selectors.
    pub fn css_selectors(&self) -> [&str; 6] {
        [
            self.record_anchor.as_str(),
            self.info_container.as_str(),
            self.title.as_str(),
            self.author_icon.as_str(),
            self.publisher_icon.as_str(),
            self.annotation.as_str(),
        ]
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            record_anchor: defaults::record_anchor(),
            primary_anchor_class: defaults::primary_anchor_class(),
            info_container: defaults::info_container(),
            title: defaults::title(),
            author_icon: defaults::author_icon(),
            publisher_icon: defaults::publisher_icon(),
            annotation: defaults::annotation(),
            record_path_prefix: defaults::record_path_prefix(),
        }
    }
}

/// Download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Fast download API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Directory files are written to
    #[serde(default = "defaults::directory")]
    pub directory: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            directory: defaults::directory(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; bookfetch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Endpoint defaults
    pub fn base_url() -> String {
        "https://annas-archive.org".into()
    }
    pub fn search_path() -> String {
        "/search?q={query}".into()
    }
    pub fn download_api_path() -> String {
        "/dyn/api/fast_download.json?md5={hash}&key={key}".into()
    }

    // Selector defaults
    pub fn record_anchor() -> String {
        "a[href^='/md5/']".into()
    }
    pub fn primary_anchor_class() -> String {
        "custom-a block mr-2 sm:mr-4 hover:opacity-80".into()
    }
    pub fn info_container() -> String {
        "div.max-w-full".into()
    }
    pub fn title() -> String {
        "a[href^='/md5/']".into()
    }
    pub fn author_icon() -> String {
        r"a[href^='/search'] span.icon-\[mdi--user-edit\]".into()
    }
    pub fn publisher_icon() -> String {
        r"a[href^='/search'] span.icon-\[mdi--company\]".into()
    }
    pub fn annotation() -> String {
        "div.text-gray-800".into()
    }
    pub fn record_path_prefix() -> String {
        "/md5/".into()
    }

    // Download defaults
    pub fn directory() -> String {
        ".".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_placeholders() {
        let mut config = Config::default();
        config.endpoints.download_api_path = "/dyn/api/fast_download.json?md5={hash}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.annotation = "[[invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [endpoints]
            base_url = "https://mirror.example"

            [download]
            secret_key = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoints.base_url, "https://mirror.example");
        assert_eq!(config.endpoints.search_path, "/search?q={query}");
        assert_eq!(config.download.secret_key.as_deref(), Some("abc"));
        assert_eq!(config.download.directory, ".");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn endpoint_urls_encode_values() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            endpoints.search_url("dune messiah").unwrap().as_str(),
            "https://annas-archive.org/search?q=dune+messiah"
        );
        assert_eq!(
            endpoints.download_api_url("abc", "k&y").unwrap().as_str(),
            "https://annas-archive.org/dyn/api/fast_download.json?md5=abc&key=k%26y"
        );
    }

    #[test]
    fn endpoint_urls_follow_base_url() {
        let endpoints = EndpointConfig::with_base_url("http://127.0.0.1:8080");
        assert_eq!(
            endpoints.search_url("x").unwrap().as_str(),
            "http://127.0.0.1:8080/search?q=x"
        );
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.apply_overrides(Some("key".to_string()), Some(" ".to_string()));
        assert_eq!(config.download.secret_key.as_deref(), Some("key"));
        assert_eq!(config.download.directory, ".");
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/bookfetch.toml");
        assert_eq!(config.endpoints.base_url, "https://annas-archive.org");
    }
}
