//! User session types
//!
//! A user session is one pod in the session namespace. These types are the
//! wire format between the API server and its clients.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest session ID accepted; the ID is stored as a label value.
pub const MAX_SESSION_ID_LEN: usize = 63;

/// Longest image tag accepted by container registries.
pub const MAX_IMAGE_TAG_LEN: usize = 128;

/// Identifier of a user session
///
/// Restricted to lowercase ASCII letters, digits and `-`, starting and ending
/// with a letter or digit, so it can be used verbatim in a pod name and a
/// label value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(Error::Validation("session ID cannot be empty".to_string()));
        }
        if id.len() > MAX_SESSION_ID_LEN {
            return Err(Error::Validation(format!(
                "session ID must be at most {} characters, got {}",
                MAX_SESSION_ID_LEN,
                id.len()
            )));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(Error::Validation(format!(
                "session ID contains illegal character {:?}",
                c
            )));
        }
        if id.starts_with('-') || id.ends_with('-') {
            return Err(Error::Validation(
                "session ID must start and end with a letter or digit".to_string(),
            ));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Language the session runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangConfig {
    /// Language identifier, used as the prefix of the runtime image tag
    pub id: String,
}

impl LangConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Artifact revisions a session is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revisions {
    /// Object key of the session agent binary
    pub agent: String,
    /// Object key of the ptyify binary
    pub ptyify: String,
    /// Revision suffix of the language runtime image tag
    pub lang_image: String,
}

/// Pod phase as reported by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl SessionPhase {
    /// Map a Kubernetes pod phase string
    pub fn from_pod_phase(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A user session pod present in the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub pod_name: String,
    pub session_id: SessionId,
    #[serde(default)]
    pub phase: SessionPhase,
}

/// Request to create a user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub session_id: SessionId,
    pub lang_config: LangConfig,
    pub revisions: Revisions,
}

impl CreateSessionRequest {
    /// Check every field that ends up in the pod resource
    ///
    /// The binary revisions are spliced into a shell command line, and the
    /// language ID and image revision form an image tag.
    pub fn validate(&self) -> Result<()> {
        validate_object_key("agent revision", &self.revisions.agent)?;
        validate_object_key("ptyify revision", &self.revisions.ptyify)?;
        validate_tag_component("language ID", &self.lang_config.id)?;
        validate_tag_component("language image revision", &self.revisions.lang_image)?;

        let tag_len = self.lang_config.id.len() + 1 + self.revisions.lang_image.len();
        if tag_len > MAX_IMAGE_TAG_LEN {
            return Err(Error::Validation(format!(
                "image tag would be {} characters, limit is {}",
                tag_len, MAX_IMAGE_TAG_LEN
            )));
        }

        Ok(())
    }
}

fn validate_object_key(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field)));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(Error::Validation(format!(
            "{} may only contain ASCII letters, digits, '.', '_' and '-'",
            field
        )));
    }
    Ok(())
}

fn validate_tag_component(field: &str, value: &str) -> Result<()> {
    validate_object_key(field, value)?;
    if value.starts_with('.') || value.starts_with('-') {
        return Err(Error::Validation(format!(
            "{} cannot start with '.' or '-'",
            field
        )));
    }
    Ok(())
}
