//! Chat export parsing and analytics for ChatLens.
//!
//! This crate turns a raw WhatsApp text export into an [`AnalysisReport`]:
//! message volume per participant, hour and weekday distribution, emoji
//! ranking, link counts and average message length. It also defines the
//! classifier and recommender capabilities the HTTP layer serves.

#![deny(missing_docs, unsafe_code)]

/// Chat export line grammar and message assembly.
pub mod parsers;

/// Per-message content analyzers.
pub mod content;

/// Report aggregation.
pub mod aggregate;

/// Report types and response shape.
pub mod report;

/// Classifier and recommender capabilities.
pub mod ml;

/// Error types for analysis operations.
pub mod error;

/// Configuration for analysis modules.
pub mod config;

pub use aggregate::{analyze_bytes, analyze_file, analyze_str, Aggregator, FrequencyTable};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use ml::{Classifier, LinearTextClassifier, Recommender, SimilarityRecommender};
pub use parsers::{ParseStats, ParsedMessage};
pub use report::{AnalysisReport, AnalysisResponse};
