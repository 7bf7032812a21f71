/*
[INPUT]:  HTTP configuration (base URL, timeouts) and API credentials
[OUTPUT]: Signed request/response cycles decoded into typed results
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{Credentials, RequestAuthenticator};
use crate::http::{FalconxError, Result};

/// Base URL for the FalconX REST API
pub const DEFAULT_BASE_URL: &str = "https://api.falconx.io";
const ERROR_BODY_LOG_MAX_BYTES: usize = 512;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Ceiling for the whole request, connect through body
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Main HTTP client for the FalconX API.
///
/// Each call signs its own timestamp, so a single client can be shared across
/// tasks (`&self` everywhere, no interior mutability).
#[derive(Debug)]
pub struct FalconxClient {
    http_client: Client,
    base_url: Url,
    authenticator: RequestAuthenticator,
}

impl FalconxClient {
    /// Create a new client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(&config.base_url)?,
            authenticator: RequestAuthenticator::new(credentials),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authenticator(&self) -> &RequestAuthenticator {
        &self.authenticator
    }

    /// Build the full URL for `path`, which may carry a query string.
    /// The base URL's own path is kept as a prefix.
    fn endpoint_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Perform one signed request and decode the JSON response into `T`.
    ///
    /// The body is serialized once and the same bytes are both signed and
    /// sent. Non-2xx statuses become typed errors without touching `T`.
    pub async fn execute<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = match body {
            Some(body) => serde_json::to_string(body)?,
            None => String::new(),
        };

        let headers = self
            .authenticator
            .build_headers(method.as_str(), path, &payload)?;

        let url = self.endpoint_url(path)?;
        let mut builder = self.http_client.request(method.clone(), url);
        for (name, value) in headers.pairs() {
            builder = builder.header(name, value);
        }
        if !payload.is_empty() {
            builder = builder.body(payload);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        debug!(
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "falconx request completed"
        );

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                method = %method,
                path,
                status = status.as_u16(),
                body = %truncate_for_log(&detail, ERROR_BODY_LOG_MAX_BYTES),
                "falconx request rejected"
            );
            return Err(FalconxError::from_status(status));
        }

        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }

    /// Signed request without a body
    pub(crate) async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute::<(), T>(Method::GET, path, None).await
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|err| FalconxError::Decode {
        reason: err.to_string(),
    })
}

pub(crate) fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ErrorKind;

    fn client(base_url: &str) -> FalconxClient {
        FalconxClient::with_config(
            Credentials::new("key", "c2VjcmV0", "pass"),
            ClientConfig::default().with_base_url(base_url),
        )
        .expect("client init")
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_endpoint_url_keeps_query_and_prefix() {
        let client = client("https://example.com/api/");
        let url = client.endpoint_url("/v1/quotes/abc?x=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1/quotes/abc?x=1");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = FalconxClient::with_config(
            Credentials::new("key", "c2VjcmV0", "pass"),
            ClientConfig::default().with_base_url("not a url"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_decode_body_error_kind() {
        let err = decode_body::<Vec<u32>>(b"{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("ééé", 3), "é...");
    }
}
