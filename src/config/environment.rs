//! Environment variable handling.
//!
//! # Variables
//! - `HOST`, `PORT`: listener overrides
//! - `APP_ENV=development`: development mode
//! - any name listed in `environment.required_variables`: must be set and non-blank

use crate::config::loader::ConfigError;
use crate::config::schema::ServerConfig;

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Apply environment overrides to `config`.
///
/// `lookup` abstracts `std::env::var` so tests do not touch the process environment.
pub fn apply_environment<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = lookup(HOST_VAR) {
        config.listener.host = host.trim().to_string();
    }

    if let Some(port) = lookup(PORT_VAR) {
        config.listener.port = port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::InvalidVariable {
                name: PORT_VAR.to_string(),
                value: port.clone(),
            })?;
    }

    if lookup(APP_ENV_VAR).is_some_and(|env| env.trim() == "development") {
        config.environment.development = true;
    }

    Ok(())
}

/// Fail if any of `names` is unset or blank, listing every offender.
pub fn verify_required_variables<F>(names: &[String], lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<String> = names
        .iter()
        .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingVariables(missing))
    }
}

/// Process environment lookup.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_listener() {
        let mut config = ServerConfig::default();
        apply_environment(&mut config, env(&[("HOST", "127.0.0.1"), ("PORT", "6600")])).unwrap();
        assert_eq!(config.listener.bind_address(), "127.0.0.1:6600");
        assert!(!config.environment.development);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut config = ServerConfig::default();
        apply_environment(&mut config, env(&[("HOST", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.listener, ServerConfig::default().listener);
    }

    #[test]
    fn test_invalid_port_is_fatal() {
        let mut config = ServerConfig::default();
        let err = apply_environment(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVariable { ref name, .. } if name == "PORT"));
    }

    #[test]
    fn test_development_flag() {
        let mut config = ServerConfig::default();
        apply_environment(&mut config, env(&[("APP_ENV", "development")])).unwrap();
        assert!(config.environment.development);
    }

    #[test]
    fn test_required_variables_lists_all_missing() {
        let names = vec!["DATABASE_URL".to_string(), "SECRET".to_string(), "TOKEN".to_string()];
        let err = verify_required_variables(&names, env(&[("SECRET", "x"), ("TOKEN", " ")])).unwrap_err();
        match err {
            ConfigError::MissingVariables(missing) => assert_eq!(missing, vec!["DATABASE_URL", "TOKEN"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(verify_required_variables(&[], env(&[])).is_ok());
    }
}
