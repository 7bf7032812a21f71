/*
[INPUT]:  HTTP method, request path, serialized body and credentials
[OUTPUT]: Signed access headers (FX-ACCESS-*)
[POS]:    Auth layer - request authentication shared by REST and WebSocket
[UPDATE]: When changing header names or canonical message layout
*/

use chrono::Utc;

use super::Credentials;
use super::signer::{canonical_message, sign};
use crate::http::Result;

pub const HEADER_SIGN: &str = "FX-ACCESS-SIGN";
pub const HEADER_TIMESTAMP: &str = "FX-ACCESS-TIMESTAMP";
pub const HEADER_KEY: &str = "FX-ACCESS-KEY";
pub const HEADER_PASSPHRASE: &str = "FX-ACCESS-PASSPHRASE";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Path signed for the socket upgrade request
pub const HANDSHAKE_PATH: &str = "/socket.io/";
pub const HANDSHAKE_METHOD: &str = "GET";

/// Header set for one signed request or one socket handshake
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub sign: String,
    pub timestamp: String,
    pub api_key: String,
    pub passphrase: String,
    pub content_type: Option<&'static str>,
}

impl AuthHeaders {
    /// Name/value pairs in the order they are attached to the request
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            (HEADER_SIGN, self.sign.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_KEY, self.api_key.as_str()),
            (HEADER_PASSPHRASE, self.passphrase.as_str()),
        ];
        if let Some(content_type) = self.content_type {
            pairs.push(("Content-Type", content_type));
        }
        pairs
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("timestamp", &self.timestamp)
            .field("api_key", &self.api_key)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Produces access headers from immutable credentials.
///
/// Stateless apart from the credentials, so one instance can be shared by
/// any number of concurrent requests. Every call stamps its own timestamp.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    credentials: Credentials,
}

impl RequestAuthenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign a REST request using the current wall-clock second.
    ///
    /// `body` must be the exact bytes that will be sent, or `""` for none.
    pub fn build_headers(&self, method: &str, path: &str, body: &str) -> Result<AuthHeaders> {
        self.build_headers_at(method, path, body, Utc::now().timestamp())
    }

    /// Sign a REST request with an explicit unix timestamp (seconds)
    pub fn build_headers_at(
        &self,
        method: &str,
        path: &str,
        body: &str,
        unix_secs: i64,
    ) -> Result<AuthHeaders> {
        let mut headers = self.sign_at(method, path, body, unix_secs)?;
        headers.content_type = Some(CONTENT_TYPE_JSON);
        Ok(headers)
    }

    /// Headers for the socket upgrade: `GET /socket.io/`, empty body, no content type
    pub fn handshake_headers(&self) -> Result<AuthHeaders> {
        self.handshake_headers_at(Utc::now().timestamp())
    }

    pub fn handshake_headers_at(&self, unix_secs: i64) -> Result<AuthHeaders> {
        self.sign_at(HANDSHAKE_METHOD, HANDSHAKE_PATH, "", unix_secs)
    }

    fn sign_at(&self, method: &str, path: &str, body: &str, unix_secs: i64) -> Result<AuthHeaders> {
        // The same string goes into the message and the timestamp header.
        let timestamp = unix_secs.to_string();
        let message = canonical_message(&timestamp, method, path, body);
        let signature = sign(&message, self.credentials.expose_secret())?;

        Ok(AuthHeaders {
            sign: signature,
            timestamp,
            api_key: self.credentials.api_key().to_string(),
            passphrase: self.credentials.expose_passphrase().to_string(),
            content_type: None,
        })
    }
}
