//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the session namespace it operates in.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use super::error::{K8sError, K8sResult};
use super::types::ClusterStatus;

/// Wrapper around kube-rs Client bound to the session namespace
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    namespace: String,
    api_server: String,
}

impl K8sClient {
    /// Create client the way kubectl would: `KUBECONFIG`, `~/.kube/config`,
    /// then the in-cluster service account
    pub async fn from_default(namespace: impl Into<String>) -> K8sResult<Self> {
        let config = Config::infer().await.map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to infer config: {}", e))
        })?;

        Self::from_config(config, namespace.into())
    }

    /// Create client from the local kubeconfig using a specific context
    pub async fn from_context(context: &str, namespace: impl Into<String>) -> K8sResult<Self> {
        let config = Config::from_kubeconfig(&KubeConfigOptions {
            context: Some(context.to_string()),
            ..Default::default()
        })
        .await
        .map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to load context '{}': {}", context, e))
        })?;

        Self::from_config(config, namespace.into())
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(
        kubeconfig_yaml: &str,
        context: Option<&str>,
        namespace: impl Into<String>,
    ) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        Self::from_config(config, namespace.into())
    }

    /// Wrap an already constructed kube-rs Client
    pub fn from_client(
        client: Client,
        namespace: impl Into<String>,
        api_server: impl Into<String>,
    ) -> Self {
        Self {
            inner: client,
            namespace: namespace.into(),
            api_server: api_server.into(),
        }
    }

    fn from_config(config: Config, namespace: String) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            namespace,
            api_server,
        })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Namespace session pods live in
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Check that the session namespace is reachable
    pub async fn health_check(&self) -> ClusterStatus {
        use k8s_openapi::api::core::v1::Pod;
        use kube::api::{Api, ListParams};

        let pods: Api<Pod> = Api::namespaced(self.inner.clone(), &self.namespace);

        match pods.list(&ListParams::default().limit(1)).await {
            Ok(_) => ClusterStatus::Connected,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, "Cluster health check failed: {}", e);
                ClusterStatus::Error
            }
        }
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("namespace", &self.namespace)
            .field("api_server", &self.api_server)
            .finish()
    }
}
