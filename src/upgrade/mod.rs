//! Streaming upgrade subsystem.
//!
//! # Data Flow
//! ```text
//! Request with Upgrade: websocket
//!     → dispatcher.rs (handshake, per-connection reader/writer)
//!     → session.rs (id, peer, outbound queue)
//!     → UpgradeHandler (on_open → on_message* → on_close)
//! ```
//!
//! # Design Decisions
//! - Upgrades bypass the request pipeline after the handshake
//! - The dispatcher is pure delegation; session bookkeeping belongs to the handler
//! - Each session runs on its own task, so sessions never block each other

pub mod dispatcher;
pub mod echo;
pub mod session;

pub use dispatcher::{UpgradeDispatcher, UpgradeHandler};
pub use echo::EchoHandler;
pub use session::{SessionId, UpgradeSession};
