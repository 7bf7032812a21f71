/*
[INPUT]:  Configured stream socket and shutdown token
[OUTPUT]: Logged stream events until shutdown
[POS]:    Example runner - websocket example set
[UPDATE]: When stream channels or event kinds change
*/

use anyhow::{Context, Result};
use falconx_adapter::{EventKind, FalconxSocket, SocketEvent, TokenPair, UserConfigMessageType};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

fn register_handlers(socket: &FalconxSocket) {
    socket.on(EventKind::Connection, |_| info!("connection established"));
    socket.on(EventKind::Disconnection, |event| {
        if let SocketEvent::Disconnected(reasons) = event {
            warn!(reasons = %reasons, "disconnected from FalconX");
        }
    });
    socket.on(EventKind::Response, |event| match event.user_config_response() {
        Some(response) => info!(
            message_type = %response.message_type,
            client_request_id = %response.client_request_id,
            success = response.success,
            data = %response.data,
            "user config response"
        ),
        None => info!(event = ?event, "response received"),
    });
    socket.on(EventKind::Stream, |event| {
        if let SocketEvent::Stream(tick) = event {
            info!(tick = %tick, "price tick received");
        }
    });
    socket.on(EventKind::Error, |event| {
        if let SocketEvent::Error(payload) = event {
            warn!(payload = %payload, "stream error");
        }
    });
}

/// Connect, issue the user-config requests and one subscription, then wait for shutdown
pub async fn run(socket: &FalconxSocket, shutdown: CancellationToken) -> Result<()> {
    register_handlers(socket);
    socket.connect().await.context("connect to stream")?;

    for message_type in [
        UserConfigMessageType::AllowedMarkets,
        UserConfigMessageType::MaxConnections,
        UserConfigMessageType::MaxLevels,
    ] {
        let request_id = socket
            .request_user_config(message_type)
            .await
            .context("send user config request")?;
        info!(?message_type, request_id = %request_id, "user config requested");
    }

    let tiers = vec![Decimal::new(1, 3), Decimal::new(1, 2), Decimal::new(1, 1)];
    let request_id = socket
        .subscribe(TokenPair::new("ETH", "USD"), tiers)
        .await
        .context("subscribe to ETH/USD")?;
    info!(request_id = %request_id, "subscribed to ETH/USD price stream");

    shutdown.cancelled().await;
    socket.disconnect().await.context("disconnect from stream")?;
    Ok(())
}
