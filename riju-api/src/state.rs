//! Application State
//!
//! Shared state for the Riju API server

use std::sync::Arc;

use crate::health::HealthChecker;
use crate::kubernetes::SessionManager;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
    pub health_checker: Arc<HealthChecker>,
}

impl AppState {
    pub fn new(session_manager: SessionManager) -> Self {
        Self {
            session_manager: Arc::new(session_manager),
            health_checker: Arc::new(HealthChecker::new(env!("CARGO_PKG_VERSION"))),
        }
    }
}
