//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     src/routes/**.rs (enumerated by build.rs)
//!     → pattern.rs (file path → normalized pattern)
//!     → table.rs (reject bad/duplicate routes, freeze)
//!
//! Incoming Request (path, query)
//!     → matcher.rs (most specific pattern, bind params)
//!     → params.rs (query string decoding)
//!     → Return: MatchedRoute or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route

pub mod definition;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod table;

pub use definition::{Accepts, BodyPolicy, MethodSet, Returns, RouteDefinition};
pub use matcher::MatchedRoute;
pub use params::{PathParams, QueryParams};
pub use table::{Route, RouteModule, RouteTable, RouteTableError};
