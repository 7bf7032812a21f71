/*
[INPUT]:  Decoded socket events and caller request parameters
[OUTPUT]: Typed event kinds, envelopes and disconnect reasons
[POS]:    WebSocket layer - message types
[UPDATE]: When adding new event kinds or envelope fields
*/

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::http::{ErrorKind, FalconxError};
use crate::types::serde_helpers;
use crate::types::{TokenPair, UserConfigMessageType};

/// Inbound event kinds a handler can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connection,
    Disconnection,
    Response,
    Stream,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connection => "connection",
            EventKind::Disconnection => "disconnection",
            EventKind::Response => "response",
            EventKind::Stream => "stream",
            EventKind::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "connection" => Some(EventKind::Connection),
            "disconnection" => Some(EventKind::Disconnection),
            "response" => Some(EventKind::Response),
            "stream" => Some(EventKind::Stream),
            "error" => Some(EventKind::Error),
            _ => None,
        }
    }
}

/// Outbound channels accepted by the streaming namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundKind {
    Request,
    Subscribe,
}

impl OutboundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboundKind::Request => "request",
            OutboundKind::Subscribe => "subscribe",
        }
    }
}

/// Event delivered to a registered handler
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Connected,
    Disconnected(DisconnectReasons),
    Response(Value),
    Stream(Value),
    Error(Value),
}

impl SocketEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SocketEvent::Connected => EventKind::Connection,
            SocketEvent::Disconnected(_) => EventKind::Disconnection,
            SocketEvent::Response(_) => EventKind::Response,
            SocketEvent::Stream(_) => EventKind::Stream,
            SocketEvent::Error(_) => EventKind::Error,
        }
    }

    /// Decode a `response` payload as a user-config reply
    pub fn user_config_response(&self) -> Option<UserConfigResponse> {
        match self {
            SocketEvent::Response(value) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// User-config query sent on the `request` channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfigRequest {
    pub message_type: UserConfigMessageType,
    pub client_request_id: String,
}

impl UserConfigRequest {
    pub fn new(message_type: UserConfigMessageType) -> Self {
        Self {
            message_type,
            client_request_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfigResponse {
    pub message_type: String,
    pub client_request_id: String,
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Value,
}

/// Price stream subscription for one pair at several quantity tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionRequest {
    pub token_pair: TokenPair,
    #[serde(serialize_with = "serde_helpers::serialize_decimal_vec_as_number")]
    pub quantity: Vec<Decimal>,
    pub client_request_id: String,
}

impl SubscriptionRequest {
    pub fn new(token_pair: TokenPair, quantity: Vec<Decimal>) -> Self {
        Self {
            token_pair,
            quantity,
            client_request_id: Uuid::new_v4().to_string(),
        }
    }
}

/// One reason a stream session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectCause {
    pub kind: ErrorKind,
    pub reason: String,
}

impl DisconnectCause {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn client_closed() -> Self {
        Self::new(ErrorKind::Transport, "connection closed by client")
    }
}

impl From<&FalconxError> for DisconnectCause {
    fn from(err: &FalconxError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

/// Every cause observed while a session was torn down, combined into one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectReasons {
    causes: Vec<DisconnectCause>,
}

impl DisconnectReasons {
    pub fn push(&mut self, cause: DisconnectCause) {
        self.causes.push(cause);
    }

    pub fn causes(&self) -> &[DisconnectCause] {
        &self.causes
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn is_auth_rejected(&self) -> bool {
        self.causes
            .iter()
            .any(|cause| cause.kind == ErrorKind::AuthRejected)
    }
}

impl From<DisconnectCause> for DisconnectReasons {
    fn from(cause: DisconnectCause) -> Self {
        Self {
            causes: vec![cause],
        }
    }
}

impl fmt::Display for DisconnectReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.causes.is_empty() {
            return f.write_str("no reason reported");
        }
        for (idx, cause) in self.causes.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_names() {
        for kind in [
            EventKind::Connection,
            EventKind::Disconnection,
            EventKind::Response,
            EventKind::Stream,
            EventKind::Error,
        ] {
            assert_eq!(EventKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_name("heartbeat"), None);
    }

    #[test]
    fn test_subscription_body() {
        let mut request = SubscriptionRequest::new(
            TokenPair::new("ETH", "USD"),
            vec!["0.001".parse().unwrap(), "0.1".parse().unwrap()],
        );
        request.client_request_id = "req-1".to_string();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "token_pair": {"base_token": "ETH", "quote_token": "USD"},
                "quantity": [0.001, 0.1],
                "client_request_id": "req-1"
            })
        );
    }

    #[test]
    fn test_user_config_request_gets_fresh_id() {
        let first = UserConfigRequest::new(UserConfigMessageType::MaxLevels);
        let second = UserConfigRequest::new(UserConfigMessageType::MaxLevels);
        assert_ne!(first.client_request_id, second.client_request_id);
        assert!(Uuid::parse_str(&first.client_request_id).is_ok());
    }

    #[test]
    fn test_user_config_response_from_event() {
        let event = SocketEvent::Response(json!({
            "message_type": "GET_MAX_LEVELS",
            "client_request_id": "req-1",
            "success": true,
            "data": {"max_levels": 3},
            "error": null
        }));
        let response = event.user_config_response().unwrap();
        assert!(response.success);
        assert_eq!(response.data, json!({"max_levels": 3}));
        assert!(SocketEvent::Stream(json!({})).user_config_response().is_none());
    }

    #[test]
    fn test_disconnect_reasons_aggregate() {
        let mut reasons = DisconnectReasons::default();
        assert_eq!(reasons.to_string(), "no reason reported");

        reasons.push(DisconnectCause::new(ErrorKind::Transport, "read failed"));
        reasons.push(DisconnectCause::new(ErrorKind::AuthRejected, "namespace refused"));

        assert_eq!(reasons.causes().len(), 2);
        assert!(reasons.is_auth_rejected());
        assert_eq!(
            reasons.to_string(),
            "transport: read failed; auth_rejected: namespace refused"
        );
    }
}
