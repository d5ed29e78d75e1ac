//! Echo handler installed by the binary.

use axum::extract::ws::Message;

use crate::upgrade::dispatcher::UpgradeHandler;
use crate::upgrade::session::UpgradeSession;

/// Logs every lifecycle event and sends each message back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl UpgradeHandler for EchoHandler {
    fn on_open(&self, session: &UpgradeSession) {
        tracing::info!(session = %session.id(), ip = %session.client_ip(), path = %session.path(), "WebSocket opened");
    }

    fn on_message(&self, session: &UpgradeSession, message: Message) {
        if !session.send(message) {
            tracing::warn!(session = %session.id(), "WebSocket gone before echo");
        }
    }

    fn on_close(&self, session: &UpgradeSession, code: u16, reason: String) {
        tracing::info!(session = %session.id(), code, reason = %reason, "WebSocket closed");
    }
}
