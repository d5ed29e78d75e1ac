//! Upgrade lifecycle dispatch.
//!
//! # Data Flow
//! ```text
//! HTTP handshake (Upgrade: websocket)
//!     → on_upgrade: split socket
//!     → writer task  ◀── session.send()
//!     → reader loop  ──▶ on_open, on_message*, on_close
//! ```

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::upgrade::session::UpgradeSession;

/// Close code reported when the peer sent a close frame without a status.
pub const CLOSE_NO_STATUS: u16 = 1005;
/// Close code reported when the connection dropped without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Receives the lifecycle events of every upgraded connection.
///
/// Callbacks for one session run in order and never concurrently.
pub trait UpgradeHandler: Send + Sync + 'static {
    fn on_open(&self, _session: &UpgradeSession) {}

    /// Text and binary messages. Ping/pong is answered by the transport.
    fn on_message(&self, session: &UpgradeSession, message: Message);

    fn on_close(&self, _session: &UpgradeSession, _code: u16, _reason: String) {}
}

/// Wires upgraded connections to a single [`UpgradeHandler`]. Holds no session state.
#[derive(Clone)]
pub struct UpgradeDispatcher {
    handler: Arc<dyn UpgradeHandler>,
}

impl std::fmt::Debug for UpgradeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeDispatcher").finish_non_exhaustive()
    }
}

impl UpgradeDispatcher {
    pub fn new(handler: impl UpgradeHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// True if the request asks for a websocket upgrade.
    pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
        headers
            .get(header::UPGRADE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
    }

    /// Complete the handshake and hand the connection to the handler.
    pub fn accept(&self, upgrade: WebSocketUpgrade, client_ip: String, path: String) -> Response {
        let dispatcher = self.clone();
        upgrade.on_upgrade(move |socket| dispatcher.run(socket, client_ip, path))
    }

    async fn run(self, socket: WebSocket, client_ip: String, path: String) {
        let (mut sink, mut stream) = socket.split();
        let (outbound, mut queue) = mpsc::unbounded_channel::<Message>();
        let session = UpgradeSession::new(client_ip, path, outbound);

        tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                let closing = matches!(message, Message::Close(_));
                if sink.send(message).await.is_err() || closing {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tracing::debug!(session = %session.id(), ip = %session.client_ip(), "Upgrade session opened");
        self.handler.on_open(&session);

        let (code, reason) = loop {
            match stream.next().await {
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|f| (f.code, f.reason.to_string()))
                        .unwrap_or((CLOSE_NO_STATUS, String::new()));
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(message)) => self.handler.on_message(&session, message),
                Some(Err(err)) => {
                    tracing::debug!(session = %session.id(), error = %err, "Upgrade session read failed");
                    break (CLOSE_ABNORMAL, err.to_string());
                }
                None => break (CLOSE_ABNORMAL, String::new()),
            }
        };

        tracing::debug!(session = %session.id(), code, "Upgrade session closed");
        self.handler.on_close(&session, code, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_upgrade_header() {
        let mut headers = HeaderMap::new();
        assert!(!UpgradeDispatcher::is_upgrade_request(&headers));
        headers.insert(header::UPGRADE, "WebSocket".parse().unwrap());
        assert!(UpgradeDispatcher::is_upgrade_request(&headers));
        headers.insert(header::UPGRADE, "h2c".parse().unwrap());
        assert!(!UpgradeDispatcher::is_upgrade_request(&headers));
    }
}
