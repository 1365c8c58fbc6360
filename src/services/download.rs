//! Book download service.
//!
//! Downloading is two sequential stages:
//!
//! 1. **Resolve**: exchange the record hash and access key for a direct
//!    download URL through the fast download API.
//! 2. **Fetch**: stream the file behind that URL into the destination
//!    directory as `{title}.{format}`.
//!
//! Nothing is retried. A file is only created once the fetch stage answered
//! with a success status, and a transfer that fails midway removes what it
//! wrote. An existing file with the same name is overwritten.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{AppError, Result};
use crate::models::{DownloadRequest, EndpointConfig};

/// Response body of the fast download API.
#[derive(Debug, Default, Deserialize)]
struct FastDownloadResponse {
    #[serde(default, rename = "downloadURL", alias = "download_url")]
    download_url: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

impl FastDownloadResponse {
    fn into_url(self) -> Result<String> {
        match self.download_url.filter(|url| !url.is_empty()) {
            Some(url) => Ok(url),
            None => Err(AppError::resolver(self.error.as_deref())),
        }
    }
}

/// Service resolving and fetching book files.
pub struct DownloadResolver {
    client: Client,
    endpoints: EndpointConfig,
}

impl DownloadResolver {
    pub fn new(client: Client, endpoints: EndpointConfig) -> Self {
        Self { client, endpoints }
    }

    /// Download a book into `dest_dir`, returning the written path.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        secret_key: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let download_url = self.resolve(&request.hash, secret_key).await?;
        let path = dest_dir.join(request.file_name());
        self.fetch(&download_url, &path).await?;

        log::info!("Downloaded {} to {}", request.hash, path.display());
        Ok(path)
    }

    /// Resolve stage: look up the direct download URL.
    async fn resolve(&self, hash: &str, secret_key: &str) -> Result<String> {
        let api_url = self.endpoints.download_api_url(hash, secret_key)?;
        log::info!("Resolving download URL for {}", hash);

        let response: FastDownloadResponse =
            self.client.get(api_url).send().await?.json().await?;
        response.into_url()
    }

    /// Fetch stage: stream the file body to `path`.
    async fn fetch(&self, url: &str, path: &Path) -> Result<()> {
        log::debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::transfer(url, status.as_u16()));
        }

        let mut file = File::create(path).await?;
        let result = stream_to_file(&mut file, response).await;
        drop(file);

        if let Err(e) = result {
            log::warn!(
                "Removing partial file {} after failed transfer: {}",
                path.display(),
                e
            );
            if let Err(remove_err) = tokio::fs::remove_file(path).await {
                log::warn!(
                    "Failed to remove partial file {}: {}",
                    path.display(),
                    remove_err
                );
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Copy a response body into `file`, returning the number of bytes written.
async fn stream_to_file(file: &mut File, response: reqwest::Response) -> Result<u64> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    writer.flush().await?;
    Ok(written)
}
