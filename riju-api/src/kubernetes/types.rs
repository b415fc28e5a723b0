//! Kubernetes types for Riju
//!
//! Settings that shape a session pod, and cluster status reporting.

use serde::{Deserialize, Serialize};

/// Label carrying the session ID on every session pod
pub const SESSION_ID_LABEL: &str = "riju.codes/user-session-id";

/// Prefix of every session pod name
pub const SESSION_POD_PREFIX: &str = "riju-user-session-";

/// Cluster connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Connected,
    Error,
}

/// HTTP probe timing against the session agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub failure_threshold: i32,
    pub initial_delay_seconds: i32,
    pub period_seconds: i32,
    pub success_threshold: i32,
    pub timeout_seconds: i32,
}

impl ProbeSettings {
    /// Agent gets up to 30 seconds to come up
    pub fn startup() -> Self {
        Self {
            failure_threshold: 30,
            initial_delay_seconds: 0,
            period_seconds: 1,
            success_threshold: 1,
            timeout_seconds: 2,
        }
    }

    pub fn readiness() -> Self {
        Self {
            failure_threshold: 1,
            initial_delay_seconds: 2,
            period_seconds: 10,
            success_threshold: 1,
            timeout_seconds: 2,
        }
    }

    pub fn liveness() -> Self {
        Self {
            failure_threshold: 3,
            initial_delay_seconds: 2,
            period_seconds: 10,
            success_threshold: 1,
            timeout_seconds: 2,
        }
    }
}

/// Everything about a session pod that does not vary per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPodConfig {
    /// Secret holding the object storage client config
    pub storage_secret: String,
    /// Secret used to pull language images
    pub image_pull_secret: String,
    /// Image of the object storage client used by the init container
    pub downloader_image: String,
    /// Alias of the object storage endpoint inside the client config
    pub storage_alias: String,
    /// Where the object storage client expects its config
    pub storage_config_path: String,
    /// Where the helper binaries are placed
    pub bin_path: String,
    /// Registry and repository of the language images
    pub lang_image_repository: String,
    pub cpu_limit: String,
    pub memory_limit: String,
    /// Port the session agent serves its health endpoint on
    pub agent_port: i32,
    pub health_path: String,
    pub startup_probe: ProbeSettings,
    pub readiness_probe: ProbeSettings,
    pub liveness_probe: ProbeSettings,
}

impl Default for SessionPodConfig {
    fn default() -> Self {
        Self {
            storage_secret: "minio-user-login".to_string(),
            image_pull_secret: "registry-user-login".to_string(),
            downloader_image: "minio/mc:RELEASE.2022-12-13T00-23-28Z".to_string(),
            storage_alias: "riju".to_string(),
            storage_config_path: "/root/.mc".to_string(),
            bin_path: "/riju-bin".to_string(),
            lang_image_repository: "localhost:30999/riju-lang".to_string(),
            cpu_limit: "1000m".to_string(),
            memory_limit: "4Gi".to_string(),
            agent_port: 869,
            health_path: "/health".to_string(),
            startup_probe: ProbeSettings::startup(),
            readiness_probe: ProbeSettings::readiness(),
            liveness_probe: ProbeSettings::liveness(),
        }
    }
}
