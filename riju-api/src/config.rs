//! Configuration management for Riju API
//!
//! This module provides a centralized configuration system that loads settings from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::kubernetes::types::SessionPodConfig;
use crate::logging::LogRotation;

/// Main configuration struct for Riju
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RijuConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Cluster connection
    pub kubernetes: KubernetesConfig,
    /// Session pod template
    pub session: SessionPodConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Cluster connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Explicit kubeconfig file; when unset the config is inferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,
    /// Context to use from the kubeconfig
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Namespace user session pods are created in
    pub namespace: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
    /// How often the log file rolls over (hourly, daily, never)
    pub rotation: LogRotation,
    /// Emit JSON on the console instead of human-readable lines
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6119,
        }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            namespace: "riju-user".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/riju"),
            file_logging_enabled: false,
            rotation: LogRotation::Daily,
            json: false,
        }
    }
}

impl RijuConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("RIJU_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/riju/config.toml")),
            Some(PathBuf::from("./config.toml")),
            Some(PathBuf::from("./riju.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("RIJU_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RIJU_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Kubernetes
        if let Some(path) = lookup("RIJU_KUBECONFIG") {
            self.kubernetes.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = lookup("RIJU_KUBE_CONTEXT") {
            self.kubernetes.context = Some(context);
        }
        if let Some(namespace) = lookup("RIJU_NAMESPACE") {
            self.kubernetes.namespace = namespace;
        }

        // Session pod
        if let Some(repo) = lookup("RIJU_LANG_IMAGE_REPOSITORY") {
            self.session.lang_image_repository = repo;
        }
        if let Some(image) = lookup("RIJU_DOWNLOADER_IMAGE") {
            self.session.downloader_image = image;
        }
        if let Some(secret) = lookup("RIJU_STORAGE_SECRET") {
            self.session.storage_secret = secret;
        }
        if let Some(secret) = lookup("RIJU_IMAGE_PULL_SECRET") {
            self.session.image_pull_secret = secret;
        }
        if let Some(cpu) = lookup("RIJU_SESSION_CPU_LIMIT") {
            self.session.cpu_limit = cpu;
        }
        if let Some(memory) = lookup("RIJU_SESSION_MEMORY_LIMIT") {
            self.session.memory_limit = memory;
        }

        // Logging
        if let Some(level) = lookup("RIJU_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = lookup("RIJU_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(path);
        }
        if let Some(enabled) = lookup("RIJU_FILE_LOGGING").and_then(|v| v.parse().ok()) {
            self.logging.file_logging_enabled = enabled;
        }
        if let Some(rotation) = lookup("RIJU_LOG_ROTATION").and_then(|v| v.parse().ok()) {
            self.logging.rotation = rotation;
        }
        if let Some(json) = lookup("RIJU_LOG_JSON").and_then(|v| v.parse().ok()) {
            self.logging.json = json;
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.kubernetes.namespace.is_empty() {
            return Err(ConfigError::Validation(
                "Session namespace cannot be empty".to_string(),
            ));
        }

        if self.session.downloader_image.is_empty() {
            return Err(ConfigError::Validation(
                "Downloader image cannot be empty".to_string(),
            ));
        }

        if self.session.lang_image_repository.is_empty() {
            return Err(ConfigError::Validation(
                "Language image repository cannot be empty".to_string(),
            ));
        }

        if !(1..=65535).contains(&self.session.agent_port) {
            return Err(ConfigError::Validation(format!(
                "Agent port {} is out of range",
                self.session.agent_port
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RijuConfig::default();
        assert_eq!(config.server.port, 6119);
        assert_eq!(config.kubernetes.namespace, "riju-user");
        assert!(config.kubernetes.kubeconfig.is_none());
        assert_eq!(config.session.agent_port, 869);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RijuConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = RijuConfig::default();
        config.kubernetes.namespace = String::new();
        assert!(config.validate().is_err());

        let mut config = RijuConfig::default();
        config.session.agent_port = 0;
        assert!(config.validate().is_err());

        let mut config = RijuConfig::default();
        config.session.downloader_image = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = RijuConfig::from_toml(
            r#"
[kubernetes]
namespace = "sessions"
context = "prod"

[session]
memory_limit = "2Gi"
"#,
        )
        .unwrap();

        assert_eq!(config.kubernetes.namespace, "sessions");
        assert_eq!(config.kubernetes.context.as_deref(), Some("prod"));
        assert_eq!(config.session.memory_limit, "2Gi");
        assert_eq!(config.session.cpu_limit, "1000m");
        assert_eq!(config.server.port, 6119);
    }

    #[test]
    fn test_invalid_toml() {
        let err = RijuConfig::from_toml("[server]\nport = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RIJU_PORT", "9000"),
            ("RIJU_NAMESPACE", "riju-test"),
            ("RIJU_KUBECONFIG", "/tmp/kubeconfig"),
            ("RIJU_LANG_IMAGE_REPOSITORY", "registry.local/lang"),
            ("RIJU_FILE_LOGGING", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = RijuConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.kubernetes.namespace, "riju-test");
        assert_eq!(
            config.kubernetes.kubeconfig,
            Some(PathBuf::from("/tmp/kubeconfig"))
        );
        assert_eq!(config.session.lang_image_repository, "registry.local/lang");
        assert!(config.logging.file_logging_enabled);
    }

    #[test]
    fn test_bad_port_override_ignored() {
        let mut config = RijuConfig::default();
        config.apply_overrides(|key| (key == "RIJU_PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 6119);
    }

    #[test]
    fn test_bad_bool_override_keeps_current_value() {
        let mut config = RijuConfig::default();
        config.logging.file_logging_enabled = true;
        config.logging.json = true;

        config.apply_overrides(|key| match key {
            "RIJU_FILE_LOGGING" | "RIJU_LOG_JSON" => Some("yes please".to_string()),
            "RIJU_LOG_ROTATION" => Some("weekly".to_string()),
            _ => None,
        });

        assert!(config.logging.file_logging_enabled);
        assert!(config.logging.json);
        assert_eq!(config.logging.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_log_rotation_setting() {
        let config = RijuConfig::from_toml("[logging]\nrotation = \"hourly\"").unwrap();
        assert_eq!(config.logging.rotation, LogRotation::Hourly);

        let mut config = RijuConfig::default();
        config.apply_overrides(|key| (key == "RIJU_LOG_ROTATION").then(|| "never".to_string()));
        assert_eq!(config.logging.rotation, LogRotation::Never);
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = RijuConfig::generate_sample();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[kubernetes]"));
        assert!(sample.contains("[session]"));
        assert!(sample.contains("[logging]"));

        let parsed = RijuConfig::from_toml(&sample).unwrap();
        assert_eq!(parsed.session, SessionPodConfig::default());
    }
}
