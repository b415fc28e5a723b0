//! Kubernetes integration for Riju
//!
//! User sessions are pods in a dedicated namespace. This module connects to
//! the cluster and creates and lists those pods. Sessions are never updated
//! here; teardown is handled elsewhere.

pub mod client;
pub mod error;
pub mod sessions;
pub mod types;

use client::K8sClient;
use error::K8sResult;
use riju_common::{CreateSessionRequest, SessionId, UserSession};
use sessions::SessionPodBuilder;
use types::{ClusterStatus, SessionPodConfig};

/// Session manager
///
/// Owns the cluster client and the pod template settings, and delegates to
/// the operations in [`sessions`].
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: K8sClient,
    builder: SessionPodBuilder,
}

impl SessionManager {
    pub fn new(client: K8sClient, pod_config: SessionPodConfig) -> Self {
        Self {
            client,
            builder: SessionPodBuilder::new(pod_config),
        }
    }

    pub fn client(&self) -> &K8sClient {
        &self.client
    }

    pub fn builder(&self) -> &SessionPodBuilder {
        &self.builder
    }

    pub async fn list_user_sessions(&self) -> K8sResult<Vec<UserSession>> {
        sessions::list_user_sessions(&self.client).await
    }

    pub async fn get_user_session(&self, session_id: &SessionId) -> K8sResult<UserSession> {
        sessions::get_user_session(&self.client, session_id).await
    }

    pub async fn create_user_session(
        &self,
        request: &CreateSessionRequest,
    ) -> K8sResult<UserSession> {
        sessions::create_user_session(&self.client, &self.builder, request).await
    }

    pub async fn cluster_status(&self) -> ClusterStatus {
        self.client.health_check().await
    }
}
