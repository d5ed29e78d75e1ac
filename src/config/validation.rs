//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, port valid)
//! - Validate URL prefixes and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a deserialized configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be between 1 and 65535"));
    }

    let paths = &config.paths;
    if paths.public_dir.trim().is_empty() {
        errors.push(ValidationError::new("paths.public_dir", "must not be empty"));
    }
    if !paths.public_prefix.starts_with('/') || paths.public_prefix.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::new(
            "paths.public_prefix",
            "must start with '/' and name at least one segment",
        ));
    }
    if !paths.favicon_path.starts_with('/') {
        errors.push(ValidationError::new("paths.favicon_path", "must start with '/'"));
    }
    if paths.favicon_file.trim().is_empty() {
        errors.push(ValidationError::new("paths.favicon_file", "must not be empty"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unrecognized level `{}`", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
