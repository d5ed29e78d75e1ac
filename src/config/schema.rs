//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Filesystem locations and URL prefixes.
    pub paths: PathsConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Runtime environment.
    pub environment: EnvironmentConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Filesystem locations and URL prefixes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the route modules were compiled from (shown in diagnostics).
    pub routes_dir: String,

    /// Directory served under `public_prefix`.
    pub public_dir: String,

    /// URL prefix of the static surface.
    pub public_prefix: String,

    /// URL of the favicon.
    pub favicon_path: String,

    /// Favicon file, relative to `public_dir`.
    pub favicon_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            routes_dir: "src/routes".to_string(),
            public_dir: "public".to_string(),
            public_prefix: "/public".to_string(),
            favicon_path: "/favicon.ico".to_string(),
            favicon_file: "assets/favicon.ico".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body read for decoding, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Runtime environment.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Development mode: verbose, pretty logs.
    pub development: bool,

    /// Environment variables that must be set and non-blank at startup.
    pub required_variables: Vec<String>,
}
