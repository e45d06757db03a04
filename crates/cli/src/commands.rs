//! CLI command definitions for ChatLens.
//!
//! Provides the command-line interface for chat export analysis, the HTTP
//! API server and the spam and recommendation models.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(name = "chatlens", author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "CHATLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a WhatsApp chat export
    Analyze(AnalyzeArgs),

    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Classify a message as spam or ham
    CheckSpam(CheckSpamArgs),

    /// Recommend movies similar to a title
    Recommend(RecommendArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Chat analysis arguments.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Exported chat file (.txt)
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of emojis in the ranking (at most 5)
    #[arg(long)]
    pub top_emojis: Option<usize>,
}

/// API server arguments.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Spam classifier artifact (JSON)
    #[arg(long, env = "CHATLENS_CLASSIFIER")]
    pub classifier: Option<PathBuf>,

    /// Recommendation artifact (JSON)
    #[arg(long, env = "CHATLENS_RECOMMENDER")]
    pub recommender: Option<PathBuf>,

    /// Disable CORS
    #[arg(long)]
    pub no_cors: bool,
}

/// Spam check arguments.
#[derive(Args, Debug)]
pub struct CheckSpamArgs {
    /// Text to classify
    pub text: String,

    /// Spam classifier artifact (JSON)
    #[arg(short, long, env = "CHATLENS_CLASSIFIER")]
    pub model: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Movie recommendation arguments.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Movie title
    pub title: String,

    /// Recommendation artifact (JSON)
    #[arg(short, long, env = "CHATLENS_RECOMMENDER")]
    pub artifact: PathBuf,

    /// Number of recommendations
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Configuration management arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format options.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON format
    Json,
}
