//! Tile image fetching.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors raised while fetching a tile image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to read response: {0}")]
    Body(String),
}

/// Source of encoded tile images.
///
/// Implemented over HTTP by [`ReqwestTileFetcher`]; tests substitute an
/// in-memory fetcher.
pub trait TileFetcher: Send + Sync {
    /// Fetches the encoded image bytes at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("hazardmap/", env!("CARGO_PKG_VERSION"));

/// Async HTTP tile fetcher using reqwest.
#[derive(Clone)]
pub struct ReqwestTileFetcher {
    client: reqwest::Client,
}

impl ReqwestTileFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl TileFetcher for ReqwestTileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        trace!(url = url, "Tile request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(url = url, status = resp.status().as_u16(), "Tile response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "Tile request failed"
                );
                return Err(FetchError::Request(e.to_string()));
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(url = url, status = status, "Tile server returned error status");
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "Tile body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read tile body");
                Err(FetchError::Body(e.to_string()))
            }
        }
    }
}
