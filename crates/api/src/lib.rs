//! HTTP API server for ChatLens.
//!
//! Exposes chat export analysis, spam classification and movie
//! recommendations as JSON endpoints under a configurable base path.

#![deny(missing_docs, unsafe_code)]

pub mod config;
pub mod error;
pub mod router;
pub mod server;
pub mod state;

// Endpoint modules
pub mod chat;
pub mod movies;
pub mod spam;

pub use config::*;
pub use error::*;
pub use router::*;
pub use server::*;
pub use state::AppState;
