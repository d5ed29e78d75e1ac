//! Route modules.
//!
//! Each file in this directory is one route. Its path relative to this directory
//! is its URL pattern (`index.rs` → `/`, `users/[id].rs` → `/users/[id]`).
//! A route module exports:
//!
//! ```ignore
//! pub fn route_def() -> RouteDefinition;
//! pub async fn handler(ctx: RequestContext) -> HandlerResult;
//! ```
//!
//! The registry below is generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/routes.rs"));
