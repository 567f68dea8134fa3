use async_trait::async_trait;

use legkor_core::LegkorError;

/// Transport abstraction for archive downloads (so tests can inject canned
/// bytes instead of hitting the portal).
#[async_trait]
pub trait HungarometTransport: Send + Sync {
    /// Download one archive and return its raw (still compressed) bytes.
    ///
    /// # Errors
    /// Returns `LegkorError::Fetch` for any network-level failure, including
    /// non-success status codes.
    async fn get(&self, url: &str) -> Result<Vec<u8>, LegkorError>;
}

/// Production transport backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build with a fresh `reqwest::Client`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build from an existing `reqwest::Client`.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HungarometTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, LegkorError> {
        tracing::debug!(url, "downloading archive");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LegkorError::fetch("hungaromet", e.to_string()))?
            .error_for_status()
            .map_err(|e| LegkorError::fetch("hungaromet", e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LegkorError::fetch("hungaromet", e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
