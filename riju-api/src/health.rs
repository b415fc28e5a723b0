//! Health check and readiness probes
//!
//! The only external dependency is the cluster API; the service is ready
//! when the session namespace can be listed.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::kubernetes::types::ClusterStatus;
use crate::kubernetes::SessionManager;

/// Overall system health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All components healthy
    Healthy,
    /// At least one component failed its check
    Unhealthy,
}

/// Individual component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// Comprehensive health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: i64,
    pub components: Vec<ComponentHealth>,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub alive: bool,
    pub timestamp: i64,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub reason: Option<String>,
    pub timestamp: i64,
}

/// Health checker for system components
pub struct HealthChecker {
    start_time: Instant,
    version: String,
}

impl HealthChecker {
    pub fn new(version: &str) -> Self {
        Self {
            start_time: Instant::now(),
            version: version.to_string(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Simple liveness check - is the service running?
    pub fn liveness(&self) -> LivenessResponse {
        LivenessResponse {
            alive: true,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Check that the cluster API answers for the session namespace
    pub async fn check_cluster(&self, sessions: &SessionManager) -> ComponentHealth {
        let start = Instant::now();
        let namespace = sessions.client().namespace();

        let (status, message) = match sessions.cluster_status().await {
            ClusterStatus::Connected => (
                HealthStatus::Healthy,
                format!("Namespace {} reachable", namespace),
            ),
            ClusterStatus::Error => (
                HealthStatus::Unhealthy,
                format!("Cannot list pods in namespace {}", namespace),
            ),
        };

        ComponentHealth {
            name: "cluster".to_string(),
            status,
            message: Some(message),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        }
    }

    /// Aggregate component health into overall status
    fn aggregate_status(components: &[ComponentHealth]) -> HealthStatus {
        if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        }
    }

    /// Build complete health response
    pub fn build_response(&self, components: Vec<ComponentHealth>) -> HealthResponse {
        let status = Self::aggregate_status(&components);

        HealthResponse {
            status,
            version: self.version.clone(),
            uptime_seconds: self.uptime_seconds(),
            timestamp: chrono::Utc::now().timestamp(),
            components,
        }
    }

    /// Check readiness (can the service accept traffic?)
    pub fn readiness(&self, components: &[ComponentHealth]) -> ReadinessResponse {
        let cluster_healthy = components
            .iter()
            .find(|c| c.name == "cluster")
            .map(|c| c.status == HealthStatus::Healthy)
            .unwrap_or(false);

        ReadinessResponse {
            ready: cluster_healthy,
            reason: (!cluster_healthy).then(|| "Cluster not reachable".to_string()),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
