// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page, failing on non-success statuses.
///
/// Returns the body together with the final URL, used as the base for
/// relative links.
pub async fn fetch_page(client: &reqwest::Client, url: url::Url) -> Result<(url::Url, String)> {
    let response = client.get(url).send().await?.error_for_status()?;
    let final_url = response.url().clone();
    let text = response.text().await?;
    Ok((final_url, text))
}
