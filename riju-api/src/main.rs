use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use riju_api::config::{KubernetesConfig, RijuConfig};
use riju_api::kubernetes::client::K8sClient;
use riju_api::kubernetes::types::ClusterStatus;
use riju_api::kubernetes::SessionManager;
use riju_api::logging::LoggingConfig;
use riju_api::shutdown::ShutdownCoordinator;
use riju_api::{routes, AppState};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RijuConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; the guard must outlive the server
    let _log_guard = LoggingConfig::from(&config.logging)
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }
    info!("Configuration loaded successfully");

    let client = connect_cluster(&config.kubernetes).await?;
    info!(
        api_server = client.api_server(),
        namespace = client.namespace(),
        "Kubernetes client ready"
    );

    let session_manager = SessionManager::new(client, config.session.clone());
    match session_manager.cluster_status().await {
        ClusterStatus::Connected => info!("Session namespace reachable"),
        ClusterStatus::Error => warn!("Session namespace not reachable yet, serving anyway"),
    }

    let state = Arc::new(AppState::new(session_manager));
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Riju API listening on {}", addr);

    let shutdown = ShutdownCoordinator::new();
    let signal_watcher = shutdown.clone();
    tokio::spawn(async move { signal_watcher.wait_for_signal().await });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn connect_cluster(cfg: &KubernetesConfig) -> anyhow::Result<K8sClient> {
    let client = match cfg.kubeconfig {
        Some(ref path) => {
            let yaml = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read kubeconfig {:?}", path))?;
            K8sClient::from_kubeconfig(&yaml, cfg.context.as_deref(), cfg.namespace.clone()).await?
        }
        None => match cfg.context {
            Some(ref context) => K8sClient::from_context(context, cfg.namespace.clone()).await?,
            None => K8sClient::from_default(cfg.namespace.clone()).await?,
        },
    };

    Ok(client)
}
