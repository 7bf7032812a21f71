/*
[INPUT]:  Text frames from the socket.io endpoint (Engine.IO v3 / Socket.IO v2)
[OUTPUT]: Decoded engine and socket packets, and their text encodings
[POS]:    WebSocket layer - packet framing
[UPDATE]: When the stream protocol revision changes
*/

use serde::Deserialize;
use serde_json::Value;

use crate::http::{FalconxError, Result};

/// Namespace used when a packet carries no `/name,` prefix
pub const DEFAULT_NAMESPACE: &str = "/";

/// Session parameters sent by the server in the open packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// Engine.IO transport packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Noop,
}

/// Socket.IO packet carried inside an engine message
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect { namespace: String },
    Disconnect { namespace: String },
    Event {
        namespace: String,
        name: String,
        data: Value,
    },
    Error { namespace: String, data: Value },
}

impl SocketPacket {
    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Error { namespace, .. } => namespace,
        }
    }

    fn type_code(&self) -> char {
        match self {
            SocketPacket::Connect { .. } => '0',
            SocketPacket::Disconnect { .. } => '1',
            SocketPacket::Event { .. } => '2',
            SocketPacket::Error { .. } => '4',
        }
    }

    fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.type_code());
        let namespace = self.namespace();
        if namespace != DEFAULT_NAMESPACE {
            out.push_str(namespace);
            out.push(',');
        }
        match self {
            SocketPacket::Event { name, data, .. } => {
                let mut args = vec![Value::String(name.clone())];
                if !data.is_null() {
                    args.push(data.clone());
                }
                out.push_str(&Value::Array(args).to_string());
            }
            SocketPacket::Error { data, .. } if !data.is_null() => {
                out.push_str(&data.to_string());
            }
            _ => {}
        }
        out
    }

    fn decode(raw: &str) -> Result<Self> {
        let mut chars = raw.chars();
        let type_code = chars
            .next()
            .ok_or_else(|| frame_error("empty socket packet"))?;
        let rest = chars.as_str();

        let (namespace, rest) = split_namespace(rest);
        // Ack ids are not used by this client; skip them.
        let payload = rest.trim_start_matches(|c: char| c.is_ascii_digit());
        let data = if payload.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(payload)
                .map_err(|err| frame_error(format!("invalid packet payload: {err}")))?
        };

        match type_code {
            '0' => Ok(SocketPacket::Connect { namespace }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let (name, data) = split_event(data)?;
                Ok(SocketPacket::Event {
                    namespace,
                    name,
                    data,
                })
            }
            '4' => Ok(SocketPacket::Error { namespace, data }),
            other => Err(frame_error(format!(
                "unsupported socket packet type {other:?}"
            ))),
        }
    }
}

impl EnginePacket {
    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{data}"),
            EnginePacket::Pong(data) => format!("3{data}"),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()),
            EnginePacket::Noop => "6".to_string(),
        }
    }

    pub fn decode(raw: &str) -> Result<Self> {
        let mut chars = raw.chars();
        let type_code = chars
            .next()
            .ok_or_else(|| frame_error("empty engine packet"))?;
        let rest = chars.as_str();

        match type_code {
            '0' => serde_json::from_str(rest)
                .map(EnginePacket::Open)
                .map_err(|err| frame_error(format!("invalid open packet: {err}"))),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(rest.to_string())),
            '3' => Ok(EnginePacket::Pong(rest.to_string())),
            '4' => SocketPacket::decode(rest).map(EnginePacket::Message),
            '6' => Ok(EnginePacket::Noop),
            other => Err(frame_error(format!(
                "unsupported engine packet type {other:?}"
            ))),
        }
    }
}

fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return (DEFAULT_NAMESPACE.to_string(), rest);
    }
    match rest.find(',') {
        Some(idx) => (rest[..idx].to_string(), &rest[idx + 1..]),
        None => {
            // `40/streaming` without a trailing comma
            let end = rest.find(&['[', '{', '"'][..]).unwrap_or(rest.len());
            (rest[..end].to_string(), &rest[end..])
        }
    }
}

fn split_event(data: Value) -> Result<(String, Value)> {
    let Value::Array(mut args) = data else {
        return Err(frame_error("event payload is not an array"));
    };
    if args.is_empty() {
        return Err(frame_error("event payload has no name"));
    }
    let name = match args.remove(0) {
        Value::String(name) => name,
        other => return Err(frame_error(format!("event name is not a string: {other}"))),
    };
    let data = match args.len() {
        0 => Value::Null,
        1 => args.remove(0),
        _ => Value::Array(args),
    };
    Ok((name, data))
}

fn frame_error(reason: impl Into<String>) -> FalconxError {
    FalconxError::Decode {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_decode_open() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":60000}"#,
        )
        .unwrap();
        match packet {
            EnginePacket::Open(info) => {
                assert_eq!(info.sid, "abc");
                assert_eq!(info.ping_interval, 25_000);
            }
            other => panic!("expected open packet, got {other:?}"),
        }
    }

    #[test]
    fn test_namespace_connect_roundtrip() {
        let connect = EnginePacket::Message(SocketPacket::Connect {
            namespace: "/streaming".to_string(),
        });
        assert_eq!(connect.encode(), "40/streaming,");
        assert_eq!(EnginePacket::decode("40/streaming,").unwrap(), connect);
        assert_eq!(EnginePacket::decode("40/streaming").unwrap(), connect);
    }

    #[test]
    fn test_default_namespace_connect() {
        assert_eq!(
            EnginePacket::decode("40").unwrap(),
            EnginePacket::Message(SocketPacket::Connect {
                namespace: DEFAULT_NAMESPACE.to_string()
            })
        );
    }

    #[test]
    fn test_encode_event() {
        let packet = EnginePacket::Message(SocketPacket::Event {
            namespace: "/streaming".to_string(),
            name: "subscribe".to_string(),
            data: json!({"client_request_id": "x"}),
        });
        assert_eq!(
            packet.encode(),
            r#"42/streaming,["subscribe",{"client_request_id":"x"}]"#
        );
    }

    #[test]
    fn test_decode_event_with_ack_id() {
        let packet =
            EnginePacket::decode(r#"42/streaming,7["stream",{"buy_price":"1.5"}]"#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Event {
                namespace: "/streaming".to_string(),
                name: "stream".to_string(),
                data: json!({"buy_price": "1.5"}),
            })
        );
    }

    #[test]
    fn test_decode_error_packet() {
        let packet = EnginePacket::decode(r#"44/streaming,"Not authorized""#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Error {
                namespace: "/streaming".to_string(),
                data: json!("Not authorized"),
            })
        );
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(EnginePacket::Pong("ack".to_string()).encode(), "3ack");
    }

    #[test]
    fn test_malformed_frames() {
        for raw in ["", "9", "42/streaming,{not json", r#"42/streaming,{"a":1}"#, "45"] {
            let err = EnginePacket::decode(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecodeError, "frame {raw:?}");
        }
    }
}
