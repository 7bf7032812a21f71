/*
[INPUT]:  Known signing vectors and credential sources
[OUTPUT]: Test results for request authentication
[POS]:    Integration tests - authentication
[UPDATE]: When signing rules or header names change
*/

mod common;

use common::{TEST_API_KEY, TEST_PASSPHRASE, TEST_SECRET, test_credentials};
use falconx_adapter::auth::authenticator::{
    HEADER_KEY, HEADER_PASSPHRASE, HEADER_SIGN, HEADER_TIMESTAMP,
};
use falconx_adapter::auth::credentials::{API_KEY_ENV, PASSPHRASE_ENV, SECRET_ENV};
use falconx_adapter::{Credentials, ErrorKind, RequestAuthenticator, canonical_message, sign};
use rstest::rstest;
use tokio_test::assert_ok;

#[rstest]
#[case("GET", "/v1/pairs", "", "0uS0DGvcLewUzVM/dCy3z50Ib0wZDJnGdU3Pd8B58CM=")]
#[case("GET", "/socket.io/", "", "D0/hh7n9Kt8RsJGMdw/z2a6yOrE/heCj+4p3vWPxXlA=")]
#[case("POST", "/v1/quotes", r#"{"a":1}"#, "/I5AXpfCYNJhTmXuThuEGK/S86Ot39+IkDDRHywanVA=")]
fn test_known_signatures(
    #[case] method: &str,
    #[case] path: &str,
    #[case] body: &str,
    #[case] expected: &str,
) {
    let message = canonical_message("1600000000", method, path, body);
    assert_eq!(assert_ok!(sign(&message, TEST_SECRET)), expected);

    let headers = assert_ok!(
        RequestAuthenticator::new(test_credentials()).build_headers_at(
            method,
            path,
            body,
            1_600_000_000
        )
    );
    assert_eq!(headers.sign, expected);
}

#[test]
fn test_header_pairs() {
    let authenticator = RequestAuthenticator::new(test_credentials());
    let headers = assert_ok!(authenticator.build_headers_at("GET", "/v1/pairs", "", 1_600_000_000));

    let pairs = headers.pairs();
    let get = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    };
    assert_eq!(get(HEADER_TIMESTAMP), Some("1600000000"));
    assert_eq!(get(HEADER_KEY), Some(TEST_API_KEY));
    assert_eq!(get(HEADER_PASSPHRASE), Some(TEST_PASSPHRASE));
    assert_eq!(get(HEADER_SIGN), Some("0uS0DGvcLewUzVM/dCy3z50Ib0wZDJnGdU3Pd8B58CM="));
    assert_eq!(get("Content-Type"), Some("application/json"));

    let handshake = assert_ok!(authenticator.handshake_headers());
    assert!(handshake.pairs().iter().all(|(key, _)| *key != "Content-Type"));
}

#[test]
fn test_malformed_secret_rejected() {
    let authenticator = RequestAuthenticator::new(Credentials::new("key", "not base64!", "pass"));
    let err = authenticator
        .build_headers("GET", "/v1/pairs", "")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSecret);
    assert!(err.is_auth_error());
}

#[test]
fn test_credentials_debug_is_redacted() {
    let rendered = format!("{:?}", test_credentials());
    assert!(rendered.contains(TEST_API_KEY));
    assert!(!rendered.contains(TEST_SECRET));
    assert!(!rendered.contains(TEST_PASSPHRASE));
}

#[test]
fn test_credentials_from_env() {
    // SAFETY: this is the only test in the binary touching these variables.
    unsafe {
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(SECRET_ENV, TEST_SECRET);
        std::env::remove_var(PASSPHRASE_ENV);
    }
    let err = Credentials::from_env().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    unsafe {
        std::env::set_var(PASSPHRASE_ENV, "env-pass");
    }
    let credentials = assert_ok!(Credentials::from_env());
    assert_eq!(credentials.api_key(), "env-key");
    assert_eq!(credentials.expose_secret(), TEST_SECRET);
    assert_eq!(credentials.expose_passphrase(), "env-pass");
}
