/*
[INPUT]:  API key, base64 secret and passphrase (explicit or from environment)
[OUTPUT]: Immutable credential bundle with redacted Debug output
[POS]:    Auth layer - credential storage for request signing
[UPDATE]: When adding credential sources or changing env variable names
*/

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::http::{FalconxError, Result};

pub const API_KEY_ENV: &str = "FALCONX_API_KEY";
pub const SECRET_ENV: &str = "FALCONX_SECRET";
pub const PASSPHRASE_ENV: &str = "FALCONX_PASSPHRASE";

/// API credentials for authenticated requests.
///
/// The secret and passphrase are wrapped in `SecretString` so they never show
/// up in `Debug` output and are zeroed on drop.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    /// Create credentials from explicit values. `secret` is the base64 string
    /// issued by the exchange, not the decoded key.
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret: SecretString::from(secret.into()),
            passphrase: SecretString::from(passphrase.into()),
        }
    }

    /// Load credentials from `FALCONX_API_KEY`, `FALCONX_SECRET` and
    /// `FALCONX_PASSPHRASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = read_env(API_KEY_ENV)?;
        let secret = read_env(SECRET_ENV)?;
        let passphrase = read_env(PASSPHRASE_ENV)?;
        Ok(Self::new(api_key, secret, passphrase))
    }

    /// The API key (public, safe to log)
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the base64 secret for signing. Never log the return value.
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Expose the passphrase for the access header
    pub fn expose_passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

fn read_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| FalconxError::Config(format!("missing environment variable {name}")))
}
