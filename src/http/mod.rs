//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, fallback dispatcher)
//!     → request.rs (request ID)
//!     → assets.rs (static short-circuit) | upgrade dispatcher
//!     → pipeline.rs (match, decode, checks, invoke)
//!         → body.rs, context.rs, handler.rs
//!     → error.rs (JSON error envelope)
//!     → Send to client
//! ```

pub mod assets;
pub mod body;
pub mod context;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod request;
pub mod server;

pub use assets::{AssetError, AssetServer};
pub use body::{FormData, FormField, RequestBody};
pub use context::RequestContext;
pub use error::{DispatchError, ErrorBody};
pub use handler::{BoxError, Handler, HandlerResult};
pub use pipeline::Pipeline;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
