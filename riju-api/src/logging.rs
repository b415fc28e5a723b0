//! Logging configuration module
//!
//! Builds the tracing subscriber: console output plus an optional rolling
//! JSON log file.

use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<PathBuf>,
    pub rotation: LogRotation,
    pub json_format: bool,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(LogRotation::Hourly),
            "daily" => Ok(LogRotation::Daily),
            "never" => Ok(LogRotation::Never),
            other => Err(format!("unknown log rotation '{}'", other)),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
            json_format: false,
        }
    }
}

impl From<&config::LoggingConfig> for LoggingConfig {
    fn from(cfg: &config::LoggingConfig) -> Self {
        Self {
            level: cfg.level.clone(),
            file_path: cfg.file_logging_enabled.then(|| cfg.log_dir.clone()),
            rotation: cfg.rotation,
            json_format: cfg.json,
        }
    }
}

impl LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Initialize logging based on configuration
    ///
    /// The returned guard flushes the file writer; keep it alive for the
    /// lifetime of the process.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
        let console_layer = if self.json_format {
            fmt::layer()
                .with_target(true)
                .with_writer(io::stdout)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_ansi(true)
                .with_writer(io::stdout)
                .boxed()
        };

        let (file_layer, guard) = match self.file_path {
            Some(ref path) => {
                let file_appender = match self.rotation {
                    LogRotation::Hourly => rolling::hourly(path, "riju-api.log"),
                    LogRotation::Daily => rolling::daily(path, "riju-api.log"),
                    LogRotation::Never => rolling::never(path, "riju-api.log"),
                };

                let (writer, guard) = non_blocking(file_appender);

                let layer = fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(writer)
                    .boxed();

                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        tracing::info!("Logging initialized - level: {}", self.level);

        Ok(guard)
    }
}
