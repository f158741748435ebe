//! Server configuration.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::webhook_secret`].
pub const ENV_WEBHOOK_SECRET: &str = "SALLA_WEBHOOK_SECRET";
/// Environment variable overriding [`ServerConfig::port`].
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding [`ServerConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "SALLA_LOG_LEVEL";
/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Server-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Path the webhook endpoint is mounted at.
    pub webhook_path: String,
    /// Shared secret for signature verification. Unset means open mode.
    pub webhook_secret: Option<String>,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            webhook_path: "/webhook".to_string(),
            webhook_secret: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Applies environment overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(ENV_WEBHOOK_SECRET) {
            self.webhook_secret = Some(secret).filter(|s| !s.is_empty());
        }
        if let Some(port) = lookup(ENV_PORT).filter(|p| !p.is_empty()) {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::ParseError(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|l| !l.is_empty()) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Checks that [`webhook_path`](Self::webhook_path) can be mounted.
    ///
    /// The path must start with `/`, carry no route captures or wildcards, and
    /// not collide with [`HEALTH_PATH`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.webhook_path;
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "webhook_path must start with '/': {:?}",
                path
            )));
        }
        if path.contains(['{', '}', '*', ':']) {
            return Err(ConfigError::InvalidValue(format!(
                "webhook_path must be a literal path: {:?}",
                path
            )));
        }
        if path == HEALTH_PATH {
            return Err(ConfigError::InvalidValue(format!(
                "webhook_path conflicts with {}",
                HEALTH_PATH
            )));
        }
        Ok(())
    }

    /// Address to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses [`log_level`](Self::log_level).
    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::ParseError(format!("unknown log level: {}", self.log_level)))
    }
}

/// Parses configuration from TOML text.
///
/// Settings live under a `[server]` table; a missing table means defaults.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: toml::Value =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let server: ServerConfig = config
        .get("server")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    server.validate()?;
    Ok(server)
}

/// Loads configuration from an optional TOML file, then applies environment overrides.
pub fn load_config(path: Option<&str>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            parse_config(&content)?
        }
        None => ServerConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8080);
        assert_eq!(server.webhook_path, "/webhook");
        assert!(server.webhook_secret.is_none());
        assert_eq!(server.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"
            [server]
            port = 9000
            webhook_secret = "from-file"
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.webhook_secret.as_deref(), Some("from-file"));
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_missing_server_table_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_config("[server\nport = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = parse_config("[server]\nport = 9000\nwebhook_secret = \"file\"").unwrap();
        config
            .apply_env(env(&[
                (ENV_WEBHOOK_SECRET, "env-secret"),
                (ENV_PORT, "3000"),
                (ENV_LOG_LEVEL, "warn"),
            ]))
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.webhook_secret.as_deref(), Some("env-secret"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_empty_secret_selects_open_mode() {
        let mut config = parse_config("[server]\nwebhook_secret = \"file\"").unwrap();
        config.apply_env(env(&[(ENV_WEBHOOK_SECRET, "")])).unwrap();
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        let result = config.apply_env(env(&[(ENV_PORT, "eighty")]));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_webhook_path_without_leading_slash_is_rejected() {
        let result = parse_config("[server]\nwebhook_path = \"webhook\"");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_webhook_path_must_be_mountable() {
        for path in ["", "/hooks/{id}", "/hooks/*rest", "/health"] {
            let config = ServerConfig {
                webhook_path: path.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue(_))),
                "{:?}",
                path
            );
        }

        let custom = parse_config("[server]\nwebhook_path = \"/hooks/salla\"").unwrap();
        assert_eq!(custom.webhook_path, "/hooks/salla");
    }

    #[test]
    fn test_unknown_log_level() {
        let config = ServerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.tracing_level().is_err());
    }
}
