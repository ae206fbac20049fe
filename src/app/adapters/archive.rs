//! Authenticated archive access
//!
//! Every network interaction of both pipelines goes through the
//! [`ArchiveClient`] trait: per-day manifest text, companion directory
//! pages, and swath file downloads. The production implementation speaks
//! bearer-token HTTP; tests substitute canned in-memory clients.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{Error, Result};

/// Per-request timeout. The archive occasionally stalls mid-response on
/// large granules; without a ceiling one dead connection hangs the whole
/// sequential run.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Archive operations needed by the listing and retrieval pipelines
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Fetch a text resource (metadata manifest or directory page)
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Download a file to `dest`, replacing any existing file
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Bearer-token HTTP client for the LAADS-style archive
pub struct HttpArchiveClient {
    client: reqwest::Client,
    token: String,
}

impl HttpArchiveClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::http("", "failed to build HTTP client", Some(e)))?;
        Ok(Self {
            client,
            token: token.into(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| Error::http(url, "request failed", Some(e)))?;

        if !response.status().is_success() {
            return Err(Error::http(
                url,
                format!("archive returned status {}", response.status()),
                None,
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl ArchiveClient for HttpArchiveClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("fetching {url}");
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| Error::http(url, "failed to read response body", Some(e)))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("downloading {url} -> {}", dest.display());
        let response = self.get(url).await?;

        // Stream into a part file in the same directory; rename on
        // completion so a killed run never leaves a truncated file that
        // the cache check would mistake for a finished download
        let part = dest.with_extension("part");
        let mut file = tokio::fs::File::create(&part)
            .await
            .map_err(|e| Error::io(format!("failed to create {}", part.display()), e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::http(url, "download stream failed", Some(e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::io(format!("failed to write {}", part.display()), e))?;
        }
        file.flush()
            .await
            .map_err(|e| Error::io(format!("failed to flush {}", part.display()), e))?;
        drop(file);

        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| Error::io(format!("failed to move {} into place", part.display()), e))
    }
}
