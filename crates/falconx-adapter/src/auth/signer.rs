/*
[INPUT]:  Canonical message string and base64-encoded shared secret
[OUTPUT]: Base64 HMAC-SHA256 signature
[POS]:    Auth layer - cryptographic signing for request authentication
[UPDATE]: When changing signing algorithm or key format
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::{FalconxError, Result};

pub type HmacSha256 = Hmac<Sha256>;

/// Build the exact string the server verifies: `timestamp + method + path + body`.
///
/// No separators are inserted. `path` includes the query string if any and
/// `body` is the raw JSON that goes on the wire (empty when there is none).
pub fn canonical_message(timestamp: &str, method: &str, path: &str, body: &str) -> String {
    let mut message =
        String::with_capacity(timestamp.len() + method.len() + path.len() + body.len());
    message.push_str(timestamp);
    message.push_str(method);
    message.push_str(path);
    message.push_str(body);
    message
}

/// Sign `message` with the base64-encoded `secret_base64`.
///
/// Returns the HMAC-SHA256 digest encoded as standard padded base64. A secret
/// that is not valid base64 fails with [`FalconxError::InvalidSecret`] before
/// any digest is computed.
pub fn sign(message: &str, secret_base64: &str) -> Result<String> {
    let key = BASE64
        .decode(secret_base64.trim())
        .map_err(|err| FalconxError::InvalidSecret {
            reason: format!("secret is not valid base64: {err}"),
        })?;
    if key.is_empty() {
        return Err(FalconxError::InvalidSecret {
            reason: "secret decodes to an empty key".to_string(),
        });
    }

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|err| FalconxError::InvalidSecret {
        reason: err.to_string(),
    })?;
    mac.update(message.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
