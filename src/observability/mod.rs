//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Every request:
//!     → access_log.rs (latency, status, url)
//!     → client_ip.rs (peer address or proxy headers)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through the access log
//! - Logging never influences the response

pub mod access_log;
pub mod client_ip;
pub mod logging;

pub use access_log::{access_log, AccessLogEntry, RequestStart};
pub use logging::init_logging;
