//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → environment.rs (HOST / PORT / APP_ENV overrides, required variables)
//!     → ServerConfig (validated, immutable)
//!     → handed to HttpServer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any configuration error is fatal before the first request

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::{apply_environment, process_env, verify_required_variables};
pub use loader::{load_config, ConfigError};
pub use schema::{
    EnvironmentConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, PathsConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationError};
