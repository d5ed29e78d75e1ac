//! Route dispatch core.
//!
//! Resolves requests against a route table compiled from `src/routes/`,
//! enforces each route's method and content-type contract, decodes bodies,
//! serves static assets and dispatches websocket upgrades.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ access log ─▶ request id ─▶ trace ─▶ dispatch
//!                                                              │
//!                       ┌──────────────────┬───────────────────┤
//!                       ▼                  ▼                   ▼
//!                 upgrade dispatcher   asset server     request pipeline
//!                 (Upgrade: websocket) (/public, favicon)  │
//!                                                          ▼
//!                                              routing (table + matcher)
//!                                                          │
//!                                                          ▼
//!                                                   route handler
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routes;
pub mod routing;
pub mod upgrade;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
