/*
[INPUT]:  Stream host configuration and subscription parameters
[OUTPUT]: Real-time price ticks and user-config replies
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod client;
pub mod frame;
pub mod message;

pub use client::{
    ConnectionState, DEFAULT_STREAM_HOST, EventHandler, FalconxSocket, STREAMING_NAMESPACE,
    SocketConfig,
};
pub use message::{
    DisconnectCause, DisconnectReasons, EventKind, OutboundKind, SocketEvent,
    SubscriptionRequest, UserConfigRequest, UserConfigResponse,
};
