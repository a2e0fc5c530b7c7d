//! Object retrieval over HTTP(S).
//!
//! Objects are fetched with a plain `GET <base_url>/<object id>`, the id
//! percent-encoded as a single path segment.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use slicestore_reassembly::{FetchError, FetchFuture, ObjectFetcher};
use tracing::debug;

/// Characters left unescaped in an object id (RFC 3986 unreserved).
const OBJECT_ID: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const USER_AGENT: &str = concat!("slicestore/", env!("CARGO_PKG_VERSION"));

/// Fetches object payloads from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpObjectFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpObjectFetcher {
    /// Creates a fetcher for objects under `base_url`.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    /// Creates a fetcher sharing an existing client.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL an object is fetched from.
    pub fn object_url(&self, object_id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(object_id, OBJECT_ID)
        )
    }

    async fn get(&self, object_id: &str) -> Result<Vec<u8>, FetchError> {
        if object_id.is_empty() {
            return Err(FetchError::InvalidObjectId("empty object id".into()));
        }

        let url = self.object_url(object_id);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Http(format!("failed to download {url}: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(object_id.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                object_id: object_id.to_string(),
                status: status.as_u16(),
            });
        }

        let data = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Http(format!("failed to read response from {url}: {e}")))?
            .to_vec();

        debug!(object_id, size = data.len(), "object downloaded");
        Ok(data)
    }
}

impl ObjectFetcher for HttpObjectFetcher {
    fn fetch(&self, object_id: &str) -> FetchFuture<'_> {
        let object_id = object_id.to_string();
        Box::pin(async move { self.get(&object_id).await })
    }
}
