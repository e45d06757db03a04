//! Command-line interface for ChatLens.
//!
//! This crate provides CLI commands for analyzing WhatsApp chat exports,
//! running the HTTP API and querying the trained model artifacts.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
