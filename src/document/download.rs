// src/document/download.rs
use crate::utils::error::DocumentError;
use reqwest::header;
use std::time::Duration;

const DOWNLOAD_USER_AGENT: &str = concat!("annex_extractor/", env!("CARGO_PKG_VERSION"));
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Creates a reqwest client configured for document downloads.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(DOWNLOAD_USER_AGENT)
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
}

/// Downloads a PDF and returns its raw bytes.
pub async fn fetch_pdf(url: &str) -> Result<Vec<u8>, DocumentError> {
    let client = build_client()?;

    tracing::info!("Downloading document from: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/pdf,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DocumentError::NotFound(url.to_string()));
        }
        return Err(DocumentError::Http(status));
    }

    let bytes = response.bytes().await?;
    tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);

    Ok(bytes.to_vec())
}
