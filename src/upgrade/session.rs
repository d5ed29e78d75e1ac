//! Upgrade sessions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::{CloseFrame, Message};
use tokio::sync::mpsc;

// Ids only need to be unique.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an upgraded connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ws-{}", self.0)
    }
}

/// One accepted streaming connection.
///
/// Outbound messages are queued to the connection's writer task, so sending
/// never blocks a callback. Cloning yields another handle to the same connection.
#[derive(Debug, Clone)]
pub struct UpgradeSession {
    id: SessionId,
    client_ip: String,
    path: String,
    outbound: mpsc::UnboundedSender<Message>,
}

impl UpgradeSession {
    pub fn new(client_ip: String, path: String, outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: SessionId::new(),
            client_ip,
            path,
            outbound,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// Path of the upgrade request.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Queue a message. Returns false once the connection is gone.
    pub fn send(&self, message: Message) -> bool {
        self.outbound.send(message).is_ok()
    }

    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.send(Message::Text(text.into().into()))
    }

    /// Ask the peer to close the connection.
    pub fn close(&self, code: u16, reason: impl Into<String>) -> bool {
        self.send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into().into(),
        })))
    }
}
