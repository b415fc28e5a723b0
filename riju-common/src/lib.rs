//! Common types shared between riju-api and riju-cli

pub mod session;

pub use session::{
    CreateSessionRequest, LangConfig, Revisions, SessionId, SessionPhase, UserSession,
};

/// Error types shared across the workspace
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
