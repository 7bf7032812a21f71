/*
[INPUT]:  API credentials and pending request details
[OUTPUT]: HMAC signatures and signed access headers
[POS]:    Auth layer - handles FalconX API authentication
[UPDATE]: When auth flow or signature methods change
*/

pub mod authenticator;
pub mod credentials;
pub mod signer;

pub use authenticator::{AuthHeaders, RequestAuthenticator};
pub use credentials::Credentials;
pub use signer::{canonical_message, sign};
