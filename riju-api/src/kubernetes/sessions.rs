//! User session pod operations
//!
//! A session is a single pod. An init container copies the agent and ptyify
//! binaries out of object storage into a shared emptyDir, then the language
//! runtime container starts with that directory mounted read-only.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, HTTPGetAction, LocalObjectReference, Pod, PodSpec, Probe,
    ResourceRequirements, SecretVolumeSource, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, ListParams, PostParams};
use riju_common::{CreateSessionRequest, SessionId, SessionPhase, UserSession};
use tracing::{debug, info, warn};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::{
    ProbeSettings, SessionPodConfig, SESSION_ID_LABEL, SESSION_POD_PREFIX,
};

const STORAGE_CONFIG_VOLUME: &str = "minio-config";
const BIN_VOLUME: &str = "riju-bin";
const DOWNLOAD_CONTAINER: &str = "download";
const SESSION_CONTAINER: &str = "session";

/// Pod name for a session
pub fn session_pod_name(session_id: &SessionId) -> String {
    format!("{}{}", SESSION_POD_PREFIX, session_id)
}

/// Builds session pod resources from fixed settings plus per-session input
#[derive(Debug, Clone, Default)]
pub struct SessionPodBuilder {
    config: SessionPodConfig,
}

impl SessionPodBuilder {
    pub fn new(config: SessionPodConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionPodConfig {
        &self.config
    }

    /// Full language image reference: `<repository>:<lang>-<revision>`
    pub fn lang_image(&self, request: &CreateSessionRequest) -> String {
        format!(
            "{}:{}-{}",
            self.config.lang_image_repository, request.lang_config.id, request.revisions.lang_image
        )
    }

    /// Shell command run by the init container
    pub fn download_command(&self, request: &CreateSessionRequest) -> String {
        let alias = &self.config.storage_alias;
        let bin = &self.config.bin_path;
        // Deployed sessions run this exact string, missing space after `&&` included.
        format!(
            "mc cp {alias}/agent/{agent} {bin}/agent &&mc cp {alias}/ptyify/{ptyify} {bin}/ptyify",
            alias = alias,
            bin = bin,
            agent = request.revisions.agent,
            ptyify = request.revisions.ptyify,
        )
    }

    /// Build the pod resource for a session
    pub fn build(&self, request: &CreateSessionRequest) -> Pod {
        let session_id = request.session_id.to_string();

        let mut labels = BTreeMap::new();
        labels.insert(SESSION_ID_LABEL.to_string(), session_id);

        Pod {
            metadata: ObjectMeta {
                name: Some(session_pod_name(&request.session_id)),
                labels: Some(labels),
                ..Default::default()
            },
            spec: Some(PodSpec {
                volumes: Some(vec![
                    Volume {
                        name: STORAGE_CONFIG_VOLUME.to_string(),
                        secret: Some(SecretVolumeSource {
                            secret_name: Some(self.config.storage_secret.clone()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                    Volume {
                        name: BIN_VOLUME.to_string(),
                        empty_dir: Some(EmptyDirVolumeSource::default()),
                        ..Default::default()
                    },
                ]),
                image_pull_secrets: Some(vec![LocalObjectReference {
                    name: self.config.image_pull_secret.clone(),
                }]),
                init_containers: Some(vec![self.download_container(request)]),
                containers: vec![self.session_container(request)],
                restart_policy: Some("Never".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn download_container(&self, request: &CreateSessionRequest) -> Container {
        Container {
            name: DOWNLOAD_CONTAINER.to_string(),
            image: Some(self.config.downloader_image.clone()),
            resources: Some(ResourceRequirements::default()),
            args: Some(vec![
                "sh".to_string(),
                "-c".to_string(),
                self.download_command(request),
            ]),
            volume_mounts: Some(vec![
                VolumeMount {
                    name: STORAGE_CONFIG_VOLUME.to_string(),
                    mount_path: self.config.storage_config_path.clone(),
                    read_only: Some(true),
                    ..Default::default()
                },
                VolumeMount {
                    name: BIN_VOLUME.to_string(),
                    mount_path: self.config.bin_path.clone(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }
    }

    fn session_container(&self, request: &CreateSessionRequest) -> Container {
        let mut limits = BTreeMap::new();
        limits.insert("cpu".to_string(), Quantity(self.config.cpu_limit.clone()));
        limits.insert("memory".to_string(), Quantity(self.config.memory_limit.clone()));

        Container {
            name: SESSION_CONTAINER.to_string(),
            image: Some(self.lang_image(request)),
            resources: Some(ResourceRequirements {
                limits: Some(limits),
                ..Default::default()
            }),
            startup_probe: Some(self.health_probe(&self.config.startup_probe)),
            readiness_probe: Some(self.health_probe(&self.config.readiness_probe)),
            liveness_probe: Some(self.health_probe(&self.config.liveness_probe)),
            volume_mounts: Some(vec![VolumeMount {
                name: BIN_VOLUME.to_string(),
                mount_path: self.config.bin_path.clone(),
                read_only: Some(true),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    fn health_probe(&self, settings: &ProbeSettings) -> Probe {
        Probe {
            http_get: Some(HTTPGetAction {
                path: Some(self.config.health_path.clone()),
                port: IntOrString::Int(self.config.agent_port),
                scheme: Some("HTTP".to_string()),
                ..Default::default()
            }),
            failure_threshold: Some(settings.failure_threshold),
            initial_delay_seconds: Some(settings.initial_delay_seconds),
            period_seconds: Some(settings.period_seconds),
            success_threshold: Some(settings.success_threshold),
            timeout_seconds: Some(settings.timeout_seconds),
            ..Default::default()
        }
    }
}

/// List session pods in the session namespace
pub async fn list_user_sessions(client: &K8sClient) -> K8sResult<Vec<UserSession>> {
    let pods: Api<Pod> = Api::namespaced(client.inner().clone(), client.namespace());

    let lp = ListParams::default().labels(SESSION_ID_LABEL);
    let pod_list = pods.list(&lp).await?;

    let sessions: Vec<UserSession> = pod_list
        .items
        .into_iter()
        .filter_map(pod_to_session)
        .collect();

    debug!(
        namespace = client.namespace(),
        count = sessions.len(),
        "Listed user sessions"
    );

    Ok(sessions)
}

/// Get the session pod for one session ID
pub async fn get_user_session(client: &K8sClient, session_id: &SessionId) -> K8sResult<UserSession> {
    let pods: Api<Pod> = Api::namespaced(client.inner().clone(), client.namespace());
    let name = session_pod_name(session_id);

    let pod = pods.get_opt(&name).await?.ok_or_else(|| K8sError::ResourceNotFound {
        kind: "Pod".to_string(),
        name: name.clone(),
        namespace: client.namespace().to_string(),
    })?;

    pod_to_session(pod).ok_or_else(|| {
        K8sError::Internal(format!("Pod {} has no valid {} label", name, SESSION_ID_LABEL))
    })
}

/// Create the session pod
///
/// The request goes straight to the API server; a rejection (for example an
/// existing pod with the same name) is returned as is.
pub async fn create_user_session(
    client: &K8sClient,
    builder: &SessionPodBuilder,
    request: &CreateSessionRequest,
) -> K8sResult<UserSession> {
    request.validate()?;

    let pods: Api<Pod> = Api::namespaced(client.inner().clone(), client.namespace());
    let pod = builder.build(request);

    let created = pods
        .create(&PostParams::default(), &pod)
        .await
        .map_err(|e| {
            let err = K8sError::from(e);
            if err.status_code() == Some(409) {
                warn!(session_id = %request.session_id, "Session pod already exists");
            }
            err
        })?;

    let session = UserSession {
        pod_name: created
            .metadata
            .name
            .clone()
            .unwrap_or_else(|| session_pod_name(&request.session_id)),
        session_id: request.session_id.clone(),
        phase: SessionPhase::from_pod_phase(
            created.status.as_ref().and_then(|s| s.phase.as_deref()),
        ),
    };

    info!(
        session_id = %request.session_id,
        pod = %session.pod_name,
        namespace = client.namespace(),
        lang = %request.lang_config.id,
        "Created user session"
    );

    Ok(session)
}

/// Convert a pod to a session, skipping pods without a usable session label
fn pod_to_session(pod: Pod) -> Option<UserSession> {
    let metadata = pod.metadata;
    let pod_name = metadata.name.unwrap_or_default();

    let label = metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(SESSION_ID_LABEL));

    let session_id = match label.map(|v| SessionId::new(v.as_str())) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            debug!(pod = %pod_name, "Skipping pod with malformed session label: {}", e);
            return None;
        }
        None => {
            debug!(pod = %pod_name, "Skipping pod without session label");
            return None;
        }
    };

    let phase = SessionPhase::from_pod_phase(pod.status.as_ref().and_then(|s| s.phase.as_deref()));

    Some(UserSession {
        pod_name,
        session_id,
        phase,
    })
}
