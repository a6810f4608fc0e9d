//! OpenRS2 archive HTTP client

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use osrs_cache_formats::XteaKey;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::catalog::CacheSnapshot;
use crate::config::ArchiveConfig;
use crate::error::{ProtocolError, Result};

/// Body of a package download, chunk by chunk
pub type PackageStream = BoxStream<'static, Result<Bytes>>;

/// Operations the archive exposes
///
/// The acquisition workflow only talks to the archive through this trait, so
/// it can be driven by an in-memory fake in tests.
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    /// Every snapshot the archive knows about, across all games
    async fn fetch_catalog(&self) -> Result<Vec<CacheSnapshot>>;

    /// XTEA keys for one snapshot; may be empty
    async fn fetch_keys(&self, scope: &str, id: u32) -> Result<Vec<XteaKey>>;

    /// Zipped disk copy of one snapshot
    async fn fetch_package(&self, scope: &str, id: u32) -> Result<PackageStream>;
}

/// Client for archive.openrs2.org or a compatible mirror
#[derive(Debug, Clone)]
pub struct OpenRs2Client {
    client: Client,
    config: ArchiveConfig,
}

impl OpenRs2Client {
    /// Create a client for the configured archive
    pub fn new(config: ArchiveConfig) -> Result<Self> {
        Url::parse(config.trimmed_base_url())
            .map_err(|e| ProtocolError::InvalidEndpoint(format!("{}: {}", config.base_url, e)))?;

        let client = crate::transport::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Client for the public archive with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(ArchiveConfig::default())
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.trimmed_base_url(), path)
    }

    async fn get(&self, url: &str, json: bool) -> Result<Response> {
        tracing::debug!("archive request URL: {}", url);

        let mut request = self.client.get(url);
        if json {
            request = request
                .header(ACCEPT, "application/json")
                .timeout(self.config.request_timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus {
                method: "GET",
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        let body = self.get(&url, true).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ProtocolError::Json { url, source })
    }
}

#[async_trait]
impl ArchiveApi for OpenRs2Client {
    async fn fetch_catalog(&self) -> Result<Vec<CacheSnapshot>> {
        let snapshots: Vec<CacheSnapshot> = self.get_json("caches.json").await?;
        tracing::debug!("archive catalog lists {} snapshots", snapshots.len());
        Ok(snapshots)
    }

    async fn fetch_keys(&self, scope: &str, id: u32) -> Result<Vec<XteaKey>> {
        self.get_json(&format!("caches/{scope}/{id}/keys.json"))
            .await
    }

    async fn fetch_package(&self, scope: &str, id: u32) -> Result<PackageStream> {
        let url = self.endpoint(&format!("caches/{scope}/{id}/disk.zip"));
        let response = self.get(&url, false).await?;

        if let Some(length) = response.content_length() {
            tracing::debug!("package {} is {} bytes", url, length);
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ProtocolError::from))
            .boxed())
    }
}
