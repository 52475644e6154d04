//! Track resolution against the external catalog
//!
//! The engine only consumes the `TrackResolver` contract; the concrete
//! adapter queries a JSON catalog endpoint over HTTP. Both failure kinds
//! (unknown id, transient lookup trouble) make a load fail the same way.

use std::time::Duration;

use airwave_common::events::Track;
use airwave_common::ResolveError;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};

/// Total request timeout for catalog lookups. The engine awaits resolution
/// while holding its state lock, so a hung catalog must fail the load
/// rather than stall every transport command behind it.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves an opaque track id into playable metadata.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, track_id: &str) -> std::result::Result<Track, ResolveError>;
}

/// Catalog-backed resolver.
///
/// Expects `GET {base_url}/tracks/{id}` to return a Track JSON object
/// (`id`, `title`, `artist`, `thumbnail`, `duration` in seconds).
pub struct HttpTrackResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTrackResolver {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, CATALOG_TIMEOUT)
    }

    /// Same as `new` with an explicit total request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build catalog client: {e}")))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl TrackResolver for HttpTrackResolver {
    async fn resolve(&self, track_id: &str) -> std::result::Result<Track, ResolveError> {
        let url = format!("{}/tracks/{}", self.base_url, track_id);
        debug!(%url, "resolving track");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::Transient(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound(track_id.to_string())),
            status if !status.is_success() => Err(ResolveError::Transient(format!(
                "catalog returned {status}"
            ))),
            _ => response
                .json::<Track>()
                .await
                .map_err(|e| ResolveError::Transient(format!("invalid catalog response: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let resolver = HttpTrackResolver::new("http://catalog.local/").unwrap();
        assert_eq!(resolver.base_url, "http://catalog.local");
    }

    #[tokio::test]
    async fn hung_catalog_times_out_as_transient() {
        // accept the connection, never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let resolver =
            HttpTrackResolver::with_timeout(format!("http://{addr}"), Duration::from_millis(200))
                .unwrap();
        let err = resolver.resolve("abc").await.unwrap_err();
        assert!(matches!(err, ResolveError::Transient(_)));
    }
}
