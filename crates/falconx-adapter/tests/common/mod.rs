/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for falconx-adapter tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use falconx_adapter::{Credentials, canonical_message, sign};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";
/// base64 of "secret"
pub const TEST_SECRET: &str = "c2VjcmV0";
pub const TEST_PASSPHRASE: &str = "test-pass";

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_API_KEY, TEST_SECRET, TEST_PASSPHRASE)
}

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Recompute the signature the server expects for a request
pub fn expected_signature(timestamp: &str, method: &str, path: &str, body: &str) -> String {
    sign(&canonical_message(timestamp, method, path, body), TEST_SECRET).unwrap()
}

pub fn sample_quote() -> Value {
    json!({
        "status": "success",
        "fx_quote_id": "00c884b056f949338788dfb59e495377",
        "buy_price": "12650",
        "sell_price": null,
        "platform": "api",
        "token_pair": {"base_token": "BTC", "quote_token": "USD"},
        "quantity_requested": {"token": "BTC", "value": "10.00000"},
        "side_requested": "buy",
        "t_quote": "2019-06-27T11:59:21.875725+00:00",
        "t_expiry": "2019-06-27T11:59:22.875725+00:00",
        "is_filled": false,
        "side_executed": null,
        "price_executed": null,
        "t_execute": null,
        "trader_email": "trader1@company.com",
        "error": null,
        "warnings": null
    })
}

/// How the test socket server answers the namespace join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketBehavior {
    /// Join, then answer `subscribe` and `request` emits
    Serve,
    /// Answer the join with a namespace error packet
    RefuseNamespace,
    /// Join, then close the connection from the server side
    CloseAfterJoin,
    /// Answer the join with a namespace error packet, then drop the TCP stream
    RefuseAndDrop,
}

/// Local socket.io endpoint that checks the signed upgrade headers
pub struct TestSocketServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl TestSocketServer {
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Text frames received so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a server that validates signatures against `secret`
pub async fn start_socket_server(secret: &'static str, behavior: SocketBehavior) -> TestSocketServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));

    let log = received.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let callback = |req: &Request, resp: Response| verify_upgrade(req, resp, secret);
                let Ok(ws) = accept_hdr_async(stream, callback).await else {
                    return;
                };
                serve_session(ws, behavior, log).await;
            });
        }
    });

    TestSocketServer { addr, received }
}

/// Accept TCP connections and never answer the upgrade request
pub async fn start_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

fn verify_upgrade(
    req: &Request,
    resp: Response,
    secret: &str,
) -> Result<Response, ErrorResponse> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let timestamp = header("FX-ACCESS-TIMESTAMP");
    let message = canonical_message(&timestamp, "GET", "/socket.io/", "");
    let valid = req.uri().path() == "/socket.io/"
        && header("FX-ACCESS-KEY") == TEST_API_KEY
        && header("FX-ACCESS-PASSPHRASE") == TEST_PASSPHRASE
        && sign(&message, secret).ok() == Some(header("FX-ACCESS-SIGN"));

    if valid {
        Ok(resp)
    } else {
        let mut rejection = ErrorResponse::new(Some("invalid signature".to_string()));
        *rejection.status_mut() = StatusCode::UNAUTHORIZED;
        Err(rejection)
    }
}

async fn serve_session<S>(
    ws: tokio_tungstenite::WebSocketStream<S>,
    behavior: SocketBehavior,
    log: Arc<Mutex<Vec<String>>>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut write, mut read) = ws.split();
    let open = r#"0{"sid":"test-sid","upgrades":[],"pingInterval":25000,"pingTimeout":60000}"#;
    if write.send(Message::Text(open.into())).await.is_err() {
        return;
    }
    let _ = write.send(Message::Text("40".into())).await;

    while let Some(Ok(message)) = read.next().await {
        let text = match message {
            Message::Text(text) => text.as_str().to_string(),
            Message::Close(_) => {
                // Flush the queued close reply before hanging up.
                let _ = write.close().await;
                break;
            }
            _ => continue,
        };
        log.lock().unwrap().push(text.clone());

        if text == "2" {
            let _ = write.send(Message::Text("3".into())).await;
            continue;
        }

        if text.starts_with("40/streaming") {
            match behavior {
                SocketBehavior::Serve => {
                    let _ = write.send(Message::Text("40/streaming,".into())).await;
                }
                SocketBehavior::RefuseNamespace => {
                    let _ = write
                        .send(Message::Text(r#"44/streaming,"Not authorized""#.into()))
                        .await;
                }
                SocketBehavior::RefuseAndDrop => {
                    let _ = write
                        .send(Message::Text(r#"44/streaming,"Not authorized""#.into()))
                        .await;
                    return;
                }
                SocketBehavior::CloseAfterJoin => {
                    let _ = write.send(Message::Text("40/streaming,".into())).await;
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            }
            continue;
        }

        if let Some(payload) = text.strip_prefix("42/streaming,") {
            let Ok(Value::Array(args)) = serde_json::from_str::<Value>(payload) else {
                continue;
            };
            let name = args.first().and_then(Value::as_str).unwrap_or_default();
            let data = args.get(1).cloned().unwrap_or(Value::Null);
            let request_id = data["client_request_id"].clone();

            let reply = match name {
                "subscribe" => json!([
                    "stream",
                    {
                        "client_request_id": request_id,
                        "token_pair": data["token_pair"],
                        "buy_price": "3450.12",
                        "sell_price": "3449.80",
                        "quantity": data["quantity"]
                    }
                ]),
                "request" => json!([
                    "response",
                    {
                        "message_type": data["message_type"],
                        "client_request_id": request_id,
                        "success": true,
                        "data": {"value": 5},
                        "error": null
                    }
                ]),
                _ => continue,
            };
            let frame = format!("42/streaming,{reply}");
            let _ = write.send(Message::Text(frame.into())).await;
        }
    }
}
