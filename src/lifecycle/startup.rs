//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the effective configuration in a fixed order
//! - Reject it before any listener is bound
//!
//! # Design Decisions
//! - Precedence, lowest first: defaults, config file, environment, command line
//! - Validation runs on the merged result, so overrides are checked too

use std::path::PathBuf;

use crate::config::{
    apply_environment, load_config, validate_config, verify_required_variables, ConfigError,
    ServerConfig,
};

/// Command-line overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupOptions {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub development: bool,
}

/// Build the configuration the server will run with.
pub fn resolve_config<F>(options: &StartupOptions, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // 1. File or defaults
    let mut config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    // 2. Environment
    apply_environment(&mut config, &lookup)?;

    // 3. Command line
    if let Some(host) = &options.host {
        config.listener.host = host.clone();
    }
    if let Some(port) = options.port {
        config.listener.port = port;
    }
    if options.development {
        config.environment.development = true;
    }

    // 4. Checks
    validate_config(&config).map_err(ConfigError::Validation)?;
    verify_required_variables(&config.environment.required_variables, &lookup)?;

    Ok(config)
}
