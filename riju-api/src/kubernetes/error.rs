//! Kubernetes error types and ApiError mapping
//!
//! Maps kube-rs errors to Riju API errors for consistent error handling.

use crate::error::ApiError;
use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Kubernetes resource not found
    #[error("Resource not found: {kind}/{name} in namespace {namespace}")]
    ResourceNotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Request rejected before reaching the cluster
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl K8sError {
    /// HTTP status code carried by an API server rejection, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            K8sError::KubeError(kube::Error::Api(resp)) => Some(resp.code),
            _ => None,
        }
    }
}

impl From<riju_common::Error> for K8sError {
    fn from(err: riju_common::Error) -> Self {
        match err {
            riju_common::Error::Validation(msg) => K8sError::Validation(msg),
        }
    }
}

impl From<K8sError> for ApiError {
    fn from(err: K8sError) -> Self {
        match err {
            K8sError::ResourceNotFound {
                kind,
                name,
                namespace,
            } => ApiError::NotFound(format!(
                "{}/{} not found in namespace {}",
                kind, name, namespace
            )),
            K8sError::KubeError(kube::Error::Api(resp)) => match resp.code {
                401 => ApiError::AuthenticationFailed,
                403 => ApiError::Forbidden(resp.message),
                404 => ApiError::NotFound(resp.message),
                409 => ApiError::Conflict(resp.message),
                422 => ApiError::ValidationError(resp.message),
                _ => ApiError::Internal(format!("Kubernetes error: {}", resp.message)),
            },
            K8sError::KubeError(e) => {
                ApiError::ServiceUnavailable(format!("Kubernetes API unreachable: {}", e))
            }
            K8sError::InvalidKubeconfig(msg) => ApiError::Internal(msg),
            K8sError::Validation(msg) => ApiError::ValidationError(msg),
            K8sError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> K8sError {
        K8sError::KubeError(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("rejected with {}", reason),
            reason: reason.to_string(),
            code,
        }))
    }

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (401, "Unauthorized", 401),
            (403, "Forbidden", 403),
            (404, "NotFound", 404),
            (409, "AlreadyExists", 409),
            (422, "Invalid", 422),
            (500, "InternalError", 500),
        ];

        for (code, reason, expected) in cases {
            let api: ApiError = api_error(code, reason).into();
            assert_eq!(api.to_error_response().status, expected, "code {}", code);
        }
    }

    #[test]
    fn test_status_code_accessor() {
        assert_eq!(api_error(409, "AlreadyExists").status_code(), Some(409));
        assert_eq!(K8sError::Internal("x".into()).status_code(), None);
    }

    #[test]
    fn test_validation_from_common() {
        let err: K8sError = riju_common::Error::Validation("bad id".into()).into();
        assert!(matches!(err, K8sError::Validation(ref m) if m == "bad id"));

        let api: ApiError = err.into();
        assert_eq!(api.to_error_response().status, 422);
    }

    #[test]
    fn test_not_found_message() {
        let err = K8sError::ResourceNotFound {
            kind: "Pod".into(),
            name: "riju-user-session-abc".into(),
            namespace: "riju-user".into(),
        };
        let response = ApiError::from(err).to_error_response();
        assert_eq!(response.status, 404);
        assert_eq!(
            response.message,
            "Pod/riju-user-session-abc not found in namespace riju-user"
        );
    }
}
