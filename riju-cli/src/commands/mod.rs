//! Command handlers

pub mod session;
