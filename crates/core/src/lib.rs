//! Core types, errors, and configuration for ChatLens
//!
//! This crate provides the foundational types and error handling shared by the
//! chat analysis engine, the HTTP API and the command-line front end.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::ChatlensConfig;
pub use error::{Error, Result};
pub use types::*;
