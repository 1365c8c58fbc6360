// src/models/mod.rs

//! Domain models for bookfetch.
//!
//! This module contains the located book records and the configuration
//! structures loaded from TOML.

mod book;
mod config;

// Re-export all public types
pub use book::{BookRecord, DownloadRequest};
pub use config::{
    Config, DOWNLOAD_PATH_ENV, DownloadConfig, EndpointConfig, HttpConfig, LoggingConfig,
    SECRET_KEY_ENV, SelectorConfig,
};
