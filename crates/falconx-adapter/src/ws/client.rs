/*
[INPUT]:  Stream host configuration and API credentials
[OUTPUT]: Authenticated socket session dispatching typed events to handlers
[POS]:    WebSocket layer - real-time data stream handling
[UPDATE]: When adding new channels or changing connection logic
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{Mutex, mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tracing::{debug, info, warn};

use super::frame::{EnginePacket, SocketPacket};
use super::message::{
    DisconnectCause, DisconnectReasons, EventKind, OutboundKind, SocketEvent,
    SubscriptionRequest, UserConfigRequest,
};
use crate::auth::{AuthHeaders, Credentials, RequestAuthenticator};
use crate::http::client::truncate_for_log;
use crate::http::{ErrorKind, FalconxError, Result};
use crate::types::{TokenPair, UserConfigMessageType};

pub const DEFAULT_STREAM_HOST: &str = "ws.falconx.io";
pub const STREAMING_NAMESPACE: &str = "/streaming";
const SOCKET_IO_QUERY: &str = "/socket.io/?EIO=3&transport=websocket";
const OUTBOUND_QUEUE_SIZE: usize = 100;
const RAW_LOG_MAX_BYTES: usize = 1024;
const CLOSE_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

pub type EventHandler = Arc<dyn Fn(&SocketEvent) + Send + Sync>;

/// Stream connection configuration
#[derive(Debug, Clone)]
pub struct SocketConfig {
    pub host: String,
    pub namespace: String,
    /// Keep-alive interval for client pings
    pub ping_interval: Duration,
    /// `wss` when true, plain `ws` otherwise
    pub secure: bool,
    /// Deadline for the TCP dial plus the upgrade handshake
    pub connect_timeout: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_STREAM_HOST.to_string(),
            namespace: STREAMING_NAMESPACE.to_string(),
            ping_interval: Duration::from_secs(20),
            secure: true,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl SocketConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}{SOCKET_IO_QUERY}", self.host)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// Event-kind to handler dispatch table
#[derive(Default)]
struct HandlerTable {
    handlers: HashMap<EventKind, EventHandler>,
}

#[derive(Clone)]
struct Dispatcher {
    table: Arc<RwLock<HandlerTable>>,
}

impl Dispatcher {
    fn register(&self, kind: EventKind, handler: EventHandler) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.handlers.insert(kind, handler);
    }

    /// Runs the handler on the caller's task; a slow handler stalls the receive loop.
    fn dispatch(&self, event: SocketEvent) {
        let handler = {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            table.handlers.get(&event.kind()).cloned()
        };
        match handler {
            Some(handler) => handler(&event),
            None => debug!(event = event.kind().as_str(), "no handler registered"),
        }
    }
}

struct Session {
    id: u64,
    outbound: mpsc::Sender<WsMessage>,
}

/// Authenticated streaming client.
///
/// Auth headers are signed once per `connect` and attached to the upgrade
/// request; individual messages are not signed.
pub struct FalconxSocket {
    config: SocketConfig,
    authenticator: RequestAuthenticator,
    dispatcher: Dispatcher,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    session: Arc<Mutex<Option<Session>>>,
    next_session_id: AtomicU64,
}

impl FalconxSocket {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, SocketConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: SocketConfig) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            authenticator: RequestAuthenticator::new(credentials),
            dispatcher: Dispatcher {
                table: Arc::new(RwLock::new(HandlerTable::default())),
            },
            state_tx: Arc::new(state_tx),
            session: Arc::new(Mutex::new(None)),
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Register the handler for one event kind, replacing any previous one.
    ///
    /// Handlers run on the receive task and must not block.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&SocketEvent) + Send + Sync + 'static,
    {
        self.dispatcher.register(kind, Arc::new(handler));
    }

    /// Open one authenticated session.
    ///
    /// A rejected handshake leaves the socket `Failed`, reports the cause to the
    /// disconnection handler and returns the same error.
    pub async fn connect(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Err(FalconxError::Config(
                "WebSocket already connected".to_string(),
            ));
        }

        self.state_tx.send_replace(ConnectionState::Connecting);
        info!(url = %self.config.url(), "falconx stream connecting");

        let ws_stream = match self.open_stream().await {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        let (mut write, read) = ws_stream.split();
        let join = EnginePacket::Message(SocketPacket::Connect {
            namespace: self.config.namespace.clone(),
        });
        if let Err(err) = write.send(WsMessage::Text(join.encode().into())).await {
            let err = FalconxError::WebSocket(format!("namespace join failed: {err}"));
            self.fail(&err);
            return Err(err);
        }

        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_SIZE);
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        *session = Some(Session {
            id,
            outbound: outbound_tx,
        });
        // Publish under the lock so a finishing loop cannot interleave.
        self.state_tx.send_replace(ConnectionState::Connected);
        drop(session);

        info!(namespace = %self.config.namespace, "falconx stream connected");
        self.dispatcher.dispatch(SocketEvent::Connected);

        tokio::spawn(self.receive_loop(id).run(write, read, outbound_rx));

        Ok(())
    }

    fn receive_loop(&self, id: u64) -> ReceiveLoop {
        ReceiveLoop {
            id,
            namespace: self.config.namespace.clone(),
            ping_interval: self.config.ping_interval,
            dispatcher: self.dispatcher.clone(),
            state_tx: self.state_tx.clone(),
            session: self.session.clone(),
        }
    }

    /// Close the current session and wait until it is torn down
    pub async fn disconnect(&self) -> Result<()> {
        let session = self.session.lock().await.take();
        let Some(session) = session else {
            return Ok(());
        };

        let mut state_rx = self.state_tx.subscribe();
        drop(session.outbound);
        state_rx
            .wait_for(|state| *state != ConnectionState::Connected)
            .await
            .map_err(|_| FalconxError::WebSocket("state channel closed".to_string()))?;
        Ok(())
    }

    /// Emit `payload` on an outbound channel of the namespace
    pub async fn emit<T>(&self, kind: OutboundKind, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let packet = EnginePacket::Message(SocketPacket::Event {
            namespace: self.config.namespace.clone(),
            name: kind.as_str().to_string(),
            data: serde_json::to_value(payload)?,
        });

        let sender = {
            let guard = self.session.lock().await;
            guard
                .as_ref()
                .map(|session| session.outbound.clone())
                .ok_or_else(|| FalconxError::WebSocket("WebSocket not connected".to_string()))?
        };

        // The queue serializes concurrent emits into whole frames.
        sender
            .send(WsMessage::Text(packet.encode().into()))
            .await
            .map_err(|_| FalconxError::WebSocket("WebSocket send channel closed".to_string()))?;

        debug!(channel = kind.as_str(), "ws message emitted");
        Ok(())
    }

    /// Send a user-config query; returns its client request id
    pub async fn request_user_config(&self, message_type: UserConfigMessageType) -> Result<String> {
        let request = UserConfigRequest::new(message_type);
        self.emit(OutboundKind::Request, &request).await?;
        Ok(request.client_request_id)
    }

    /// Subscribe to price ticks for `token_pair` at each quantity tier; returns the request id
    pub async fn subscribe(&self, token_pair: TokenPair, quantities: Vec<Decimal>) -> Result<String> {
        let request = SubscriptionRequest::new(token_pair, quantities);
        self.emit(OutboundKind::Subscribe, &request).await?;
        Ok(request.client_request_id)
    }

    async fn open_stream(
        &self,
    ) -> Result<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    > {
        let headers = self.authenticator.handshake_headers()?;
        let request = build_handshake_request(&self.config.url(), &headers)?;
        let deadline = self.config.connect_timeout;
        let (stream, _response) = tokio::time::timeout(deadline, connect_async(request))
            .await
            .map_err(|_| {
                FalconxError::WebSocket(format!(
                    "handshake timed out after {}ms",
                    deadline.as_millis()
                ))
            })?
            .map_err(map_handshake_error)?;
        Ok(stream)
    }

    fn fail(&self, err: &FalconxError) {
        warn!(kind = %err.kind(), error = %err, "falconx stream connection failed");
        self.state_tx.send_replace(ConnectionState::Failed);
        self.dispatcher
            .dispatch(SocketEvent::Disconnected(DisconnectCause::from(err).into()));
    }
}

impl std::fmt::Debug for FalconxSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalconxSocket")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn build_handshake_request(url: &str, headers: &AuthHeaders) -> Result<Request> {
    let mut request = url
        .into_client_request()
        .map_err(|err| FalconxError::Config(format!("invalid stream url {url}: {err}")))?;

    for (name, value) in headers.pairs() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| FalconxError::Config(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| FalconxError::Config(format!("invalid value for {name}: {err}")))?;
        request.headers_mut().insert(name, value);
    }
    Ok(request)
}

fn map_handshake_error(err: WsError) -> FalconxError {
    match err {
        WsError::Http(response) => FalconxError::from_status(response.status()),
        other => FalconxError::WebSocket(format!("handshake failed: {other}")),
    }
}

/// Send our close frame, then read until the peer acknowledges it.
///
/// A failed send, a dropped connection or a silent peer each add a cause.
async fn close_and_drain<W, R>(write: &mut W, read: &mut R, reasons: &mut DisconnectReasons)
where
    W: futures_util::Sink<WsMessage, Error = WsError> + Unpin,
    R: futures_util::Stream<Item = std::result::Result<WsMessage, WsError>> + Unpin,
{
    if let Err(err) = write.close().await {
        push_close_failure(reasons, err);
    }

    let drained = tokio::time::timeout(CLOSE_HANDSHAKE_TIMEOUT, async {
        loop {
            match read.next().await {
                Some(Ok(WsMessage::Close(_))) => return None,
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => return None,
                Some(Err(err)) => {
                    return Some(format!("connection dropped during close handshake: {err}"));
                }
                None => return Some("connection dropped during close handshake".to_string()),
            }
        }
    })
    .await;

    let failure = match drained {
        Ok(failure) => failure,
        Err(_) => Some(format!(
            "close handshake timed out after {}ms",
            CLOSE_HANDSHAKE_TIMEOUT.as_millis()
        )),
    };
    if let Some(reason) = failure {
        reasons.push(DisconnectCause::new(ErrorKind::Transport, reason));
    }
}

fn push_close_failure(reasons: &mut DisconnectReasons, err: WsError) {
    if !matches!(err, WsError::ConnectionClosed | WsError::AlreadyClosed) {
        reasons.push(DisconnectCause::new(
            ErrorKind::Transport,
            format!("close failed: {err}"),
        ));
    }
}

/// Outcome of handling one inbound text frame
enum Flow {
    Continue,
    Reply(EnginePacket),
    Close(DisconnectCause),
}

struct ReceiveLoop {
    id: u64,
    namespace: String,
    ping_interval: Duration,
    dispatcher: Dispatcher,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    session: Arc<Mutex<Option<Session>>>,
}

impl ReceiveLoop {
    async fn run<W, R>(self, mut write: W, mut read: R, mut outbound_rx: mpsc::Receiver<WsMessage>)
    where
        W: futures_util::Sink<WsMessage, Error = WsError> + Unpin,
        R: futures_util::Stream<Item = std::result::Result<WsMessage, WsError>> + Unpin,
    {
        let mut reasons = DisconnectReasons::default();
        let mut ping = tokio::time::interval(self.ping_interval.max(Duration::from_millis(100)));
        ping.tick().await;

        loop {
            tokio::select! {
                outbound = outbound_rx.recv() => {
                    match outbound {
                        Some(message) => {
                            if let Err(err) = write.send(message).await {
                                reasons.push(DisconnectCause::new(
                                    ErrorKind::Transport,
                                    format!("send failed: {err}"),
                                ));
                                break;
                            }
                        }
                        None => {
                            reasons.push(DisconnectCause::client_closed());
                            close_and_drain(&mut write, &mut read, &mut reasons).await;
                            break;
                        }
                    }
                }
                _ = ping.tick() => {
                    let frame = EnginePacket::Ping(String::new()).encode();
                    if let Err(err) = write.send(WsMessage::Text(frame.into())).await {
                        reasons.push(DisconnectCause::new(
                            ErrorKind::Transport,
                            format!("keep-alive failed: {err}"),
                        ));
                        break;
                    }
                }
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Text(text))) => match self.handle_text(text.as_str()) {
                            Flow::Continue => {}
                            Flow::Reply(packet) => {
                                if let Err(err) = write.send(WsMessage::Text(packet.encode().into())).await {
                                    reasons.push(DisconnectCause::new(
                                        ErrorKind::Transport,
                                        format!("send failed: {err}"),
                                    ));
                                    break;
                                }
                            }
                            Flow::Close(cause) => {
                                reasons.push(cause);
                                close_and_drain(&mut write, &mut read, &mut reasons).await;
                                break;
                            }
                        },
                        Some(Ok(WsMessage::Close(frame))) => {
                            let detail = frame
                                .map(|frame| format!("{} {}", frame.code, frame.reason))
                                .unwrap_or_else(|| "no close frame".to_string());
                            reasons.push(DisconnectCause::new(
                                ErrorKind::Transport,
                                format!("server closed connection: {detail}"),
                            ));
                            // The close reply is already queued; flushing it completes the handshake.
                            if let Err(err) = write.close().await {
                                push_close_failure(&mut reasons, err);
                            }
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            reasons.push(DisconnectCause::new(
                                ErrorKind::Transport,
                                format!("read failed: {err}"),
                            ));
                            break;
                        }
                        None => {
                            reasons.push(DisconnectCause::new(
                                ErrorKind::Transport,
                                "connection closed",
                            ));
                            break;
                        }
                    }
                }
            }
        }

        let owned = self.release_session().await;
        info!(session = self.id, owned, reasons = %reasons, "falconx stream disconnected");
        self.dispatcher.dispatch(SocketEvent::Disconnected(reasons));
    }

    /// Clear the session slot and publish `Disconnected` unless a newer session holds it.
    async fn release_session(&self) -> bool {
        let mut guard = self.session.lock().await;
        let owned = guard.as_ref().is_none_or(|session| session.id == self.id);
        if owned {
            *guard = None;
            self.state_tx.send_replace(ConnectionState::Disconnected);
        }
        owned
    }

    fn handle_text(&self, raw: &str) -> Flow {
        let packet = match EnginePacket::decode(raw) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(
                    error = %err,
                    bytes = raw.len(),
                    frame = %truncate_for_log(raw, RAW_LOG_MAX_BYTES),
                    "ws message parse failed"
                );
                return Flow::Continue;
            }
        };

        match packet {
            EnginePacket::Open(info) => {
                debug!(sid = %info.sid, ping_interval_ms = info.ping_interval, "engine session opened");
                Flow::Continue
            }
            EnginePacket::Ping(data) => Flow::Reply(EnginePacket::Pong(data)),
            EnginePacket::Pong(_) | EnginePacket::Noop => Flow::Continue,
            EnginePacket::Close => Flow::Close(DisconnectCause::new(
                ErrorKind::Transport,
                "server closed engine session",
            )),
            EnginePacket::Message(packet) => self.handle_socket_packet(packet),
        }
    }

    fn handle_socket_packet(&self, packet: SocketPacket) -> Flow {
        if packet.namespace() != self.namespace {
            debug!(namespace = packet.namespace(), "ignoring packet for other namespace");
            return Flow::Continue;
        }

        match packet {
            SocketPacket::Connect { .. } => {
                debug!(namespace = %self.namespace, "namespace joined");
                Flow::Continue
            }
            SocketPacket::Disconnect { .. } => Flow::Close(DisconnectCause::new(
                ErrorKind::Transport,
                "server disconnected namespace",
            )),
            SocketPacket::Error { data, .. } => {
                // The server only answers a namespace join with an error packet
                // when it refuses the session.
                let reason = format!("namespace connection refused: {data}");
                self.dispatcher.dispatch(SocketEvent::Error(data));
                Flow::Close(DisconnectCause::new(ErrorKind::AuthRejected, reason))
            }
            SocketPacket::Event { name, data, .. } => {
                match EventKind::from_name(&name) {
                    Some(EventKind::Response) => self.dispatcher.dispatch(SocketEvent::Response(data)),
                    Some(EventKind::Stream) => self.dispatcher.dispatch(SocketEvent::Stream(data)),
                    Some(EventKind::Error) => self.dispatcher.dispatch(SocketEvent::Error(data)),
                    Some(kind) => debug!(event = kind.as_str(), "ignoring lifecycle event from server"),
                    None => debug!(event = %name, "ws event unrecognized"),
                }
                Flow::Continue
            }
        }
    }
}
