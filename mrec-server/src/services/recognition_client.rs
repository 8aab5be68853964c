//! Recognition service client
//!
//! Sends one uploaded clip to the external fingerprint recognition service.
//! The clip travels as a base64 text body; the service key and host travel as
//! headers. One POST per call: no retry, no caching, no rate limiting.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{RawRecognitionResult, RecognitionOutcome};

/// Path of the detection endpoint on the service host
const DETECT_PATH: &str = "/songs/v2/detect";

/// Header carrying the service credential
const KEY_HEADER: &str = "x-rapidapi-key";

/// Header carrying the service host identifier
const HOST_HEADER: &str = "x-rapidapi-host";

/// Default upper bound on one recognition call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("mrec/", env!("CARGO_PKG_VERSION"));

/// Recognition client errors
///
/// A non-200 answer is not an error; see `RecognitionOutcome::NotFound`.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Network, DNS, TLS or connect failure reaching the service
    #[error("Recognition service unreachable: {0}")]
    Transport(String),

    /// No complete response within the configured bound
    #[error("Recognition service did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Where and how to reach the recognition service
#[derive(Clone, PartialEq, Eq)]
pub struct RecognitionEndpoint {
    pub url: String,
    pub host: String,
    pub key: String,
}

impl RecognitionEndpoint {
    /// Endpoint at `https://<host>/songs/v2/detect`
    pub fn for_host(host: impl Into<String>, key: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            url: format!("https://{}{}", host, DETECT_PATH),
            host,
            key: key.into(),
        }
    }

    /// Replace the derived URL (proxies, local stubs)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl fmt::Debug for RecognitionEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognitionEndpoint")
            .field("url", &self.url)
            .field("host", &self.host)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Anything that can turn an audio clip into a recognition outcome
///
/// `RecognitionClient` is the production implementation; handlers depend on
/// the trait so the service can be substituted.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, payload: &[u8]) -> Result<RecognitionOutcome, RecognitionError>;
}

/// HTTP client for the external recognition service
pub struct RecognitionClient {
    http_client: reqwest::Client,
    endpoint: RecognitionEndpoint,
    timeout: Duration,
}

impl RecognitionClient {
    pub fn new(endpoint: RecognitionEndpoint, timeout: Duration) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> RecognitionError {
        if err.is_timeout() {
            RecognitionError::Timeout(self.timeout)
        } else {
            RecognitionError::Transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for RecognitionClient {
    async fn recognize(&self, payload: &[u8]) -> Result<RecognitionOutcome, RecognitionError> {
        let body = BASE64_STANDARD.encode(payload);

        tracing::debug!(
            url = %self.endpoint.url,
            audio_bytes = payload.len(),
            encoded_bytes = body.len(),
            "Querying recognition service"
        );

        let response = self
            .http_client
            .post(&self.endpoint.url)
            .header(KEY_HEADER, &self.endpoint.key)
            .header(HOST_HEADER, &self.endpoint.host)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Recognition service found no match");
            return Ok(RecognitionOutcome::NotFound {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;

        let raw = match serde_json::from_str(&text) {
            Ok(document) => RawRecognitionResult::new(document),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    body_bytes = text.len(),
                    "Recognition service returned a non-JSON body, treating as empty"
                );
                RawRecognitionResult::empty()
            }
        };

        tracing::info!(body_bytes = text.len(), "Recognition service answered");

        Ok(RecognitionOutcome::Matched(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_host() {
        let endpoint = RecognitionEndpoint::for_host("shazam.p.rapidapi.com", "k");
        assert_eq!(endpoint.url, "https://shazam.p.rapidapi.com/songs/v2/detect");
        assert_eq!(endpoint.host, "shazam.p.rapidapi.com");
        assert_eq!(endpoint.key, "k");
    }

    #[test]
    fn test_endpoint_url_override_keeps_host() {
        let endpoint = RecognitionEndpoint::for_host("shazam.p.rapidapi.com", "k")
            .with_url("http://127.0.0.1:9999/detect");
        assert_eq!(endpoint.url, "http://127.0.0.1:9999/detect");
        assert_eq!(endpoint.host, "shazam.p.rapidapi.com");
    }

    #[test]
    fn test_endpoint_debug_hides_key() {
        let endpoint = RecognitionEndpoint::for_host("host", "super-secret");
        let debug = format!("{:?}", endpoint);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_client_creation() {
        let client = RecognitionClient::new(
            RecognitionEndpoint::for_host("host", "key"),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
    }
}
