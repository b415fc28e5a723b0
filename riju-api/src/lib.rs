//! Riju API Library
//!
//! Provisions and lists per-user session pods, and serves both operations
//! over HTTP.

// Core modules
pub mod config;
pub mod error;

// Application state
pub mod state;
pub use state::AppState;

// Kubernetes integration
pub mod kubernetes;

// HTTP surface
pub mod routes;

// Logging configuration
pub mod logging;

// Health checks and readiness probes
pub mod health;

// Graceful shutdown handling
pub mod shutdown;
