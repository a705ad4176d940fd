//! Request transport used by the [`Client`](crate::client::Client)
//!
//! The client only needs "GET this path, give me the bytes". Anything about
//! hosts, TLS, authentication or retries lives behind [`Transport`].

use crate::config::NodeConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches raw response bodies from a node's RPC surface.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (relative to the node root, starting with `/`).
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError>;
}

/// Longest slice of an error body kept in [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// [`Transport`] over HTTP(S) using a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut base = Url::parse(base_url).map_err(|source| TransportError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        // Url::join replaces the last segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                url: base.to_string(),
                source,
            })?;

        Ok(Self { base, client })
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self, TransportError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for an RPC path.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| TransportError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.url_for(path)?;
        debug!("GET {}", url);

        let request_error = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}
