// src/error.rs

//! Unified error handling for search and download operations.

use std::fmt;

use thiserror::Error;

/// Result type alias for bookfetch operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Message used when the resolve stage returns neither a URL nor an error.
pub const NO_DOWNLOAD_URL: &str = "failed to get download URL";

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network or transport failure reaching an endpoint
    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The resolve stage produced no usable download URL
    #[error("{0}")]
    Resolver(String),

    /// The fetch stage answered with a non-success status
    #[error("failed to download file")]
    Transfer { url: String, status: u16 },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a resolver error, falling back to a generic message.
    pub fn resolver(message: Option<&str>) -> Self {
        match message.filter(|m| !m.trim().is_empty()) {
            Some(message) => Self::Resolver(message.to_string()),
            None => Self::Resolver(NO_DOWNLOAD_URL.to_string()),
        }
    }

    /// Create a transfer error for a failed fetch stage.
    pub fn transfer(url: impl Into<String>, status: u16) -> Self {
        Self::Transfer {
            url: url.into(),
            status,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
