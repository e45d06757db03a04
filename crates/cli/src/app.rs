//! CLI application entry point and configuration.
//!
//! This module provides the main CLI application logic, including argument parsing,
//! configuration loading, and command dispatch.

use crate::commands::{
    AnalyzeArgs, CheckSpamArgs, Cli, Commands, ConfigArgs, ConfigCommand, OutputFormat,
    RecommendArgs, ServeArgs,
};
use crate::error::{CliError, Result};
use chatlens_analysis::{
    analyze_file, AnalysisConfig, AnalysisReport, Classifier, LinearTextClassifier, Recommender,
    SimilarityRecommender,
};
use chatlens_api::{start_server, ApiConfig, AppState};
use chatlens_core::config::{LogFormat, LogLevel};
use chatlens_core::constants::{NO_MESSAGES_ERROR, WEEKDAY_NAMES};
use chatlens_core::ChatlensConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, Level};

/// Configuration for the CLI application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to configuration file.
    pub config_path: Option<PathBuf>,
    /// Logging verbosity level.
    pub verbosity: u8,
    /// Settings loaded from the configuration file.
    pub chatlens: ChatlensConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            verbosity: 0,
            chatlens: ChatlensConfig::default(),
        }
    }
}

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Application configuration.
    pub config: AppConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        let cli = Cli::parse();
        Self::from_cli(cli)
    }

    /// Create an application instance from already parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Load configuration from file.
    ///
    /// An explicit `--config` path must exist; the default location is
    /// optional and falls back to built-in settings.
    fn load_config(cli: &Cli) -> Result<AppConfig> {
        let mut config = AppConfig {
            verbosity: cli.verbose,
            ..AppConfig::default()
        };

        if let Some(config_path) = &cli.config {
            if !config_path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            config.chatlens = ChatlensConfig::load(config_path)?;
            config.config_path = Some(config_path.clone());
        } else if let Ok(default_path) = ChatlensConfig::default_path() {
            if default_path.exists() {
                config.chatlens = ChatlensConfig::load(&default_path)?;
                config.config_path = Some(default_path);
            }
        }

        Ok(config)
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        // Set up logging based on verbosity
        self.setup_logging();

        // Dispatch command
        match &self.cli.command {
            Commands::Analyze(args) => self.handle_analyze(args),
            Commands::Serve(args) => self.handle_serve(args),
            Commands::CheckSpam(args) => self.handle_check_spam(args),
            Commands::Recommend(args) => self.handle_recommend(args),
            Commands::Config(args) => self.handle_config(args),
        }
    }

    /// Set up logging based on verbosity level and the configured format.
    fn setup_logging(&self) {
        let logging = &self.config.chatlens.logging;
        let configured = self.config.config_path.as_ref().map(|_| logging.level);
        let level = log_level(self.config.verbosity, configured);

        let builder = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr);
        let installed = match logging.format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        };
        installed.ok(); // Ignore errors if a subscriber is already installed
    }

    fn handle_analyze(&self, args: &AnalyzeArgs) -> Result<()> {
        let mut config = AnalysisConfig::from_core_config(&self.config.chatlens);
        if let Some(limit) = args.top_emojis {
            config = config.with_top_emoji_limit(limit);
        }

        let report = analyze_file(&args.file, &config)?;
        debug!("Parse stats: {:?}", report.parse_stats);

        match args.format {
            OutputFormat::Json => println!("{}", to_json(&report.to_response())?),
            OutputFormat::Text => print!("{}", render_report(&report)),
        }
        Ok(())
    }

    fn handle_serve(&self, args: &ServeArgs) -> Result<()> {
        let mut core = self.config.chatlens.clone();
        if let Some(host) = &args.host {
            core.http.host = host.trim().to_string();
        }
        if let Some(port) = args.port {
            core.http.port = port;
        }
        if args.no_cors {
            core.http.enable_cors = false;
        }
        if args.classifier.is_some() {
            core.models.classifier_path = args.classifier.clone();
        }
        if args.recommender.is_some() {
            core.models.recommender_path = args.recommender.clone();
        }
        core.validate()?;

        let api_config = ApiConfig::from_core_config(&core);
        let state = AppState::new(api_config.analysis.clone()).load_models(&core.models);
        info!("Serving ChatLens API on http://{}", api_config.bind_addr);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Internal(e.to_string()))?;
        runtime.block_on(start_server(api_config, state))?;
        Ok(())
    }

    fn handle_check_spam(&self, args: &CheckSpamArgs) -> Result<()> {
        let classifier = LinearTextClassifier::load(&args.model)?;
        let classification = classifier.classify(&args.text)?;

        match args.format {
            OutputFormat::Json => println!(
                "{}",
                to_json(&serde_json::json!({
                    "classification": classification,
                    "success": true,
                }))?
            ),
            OutputFormat::Text => println!("{}", classification),
        }
        Ok(())
    }

    fn handle_recommend(&self, args: &RecommendArgs) -> Result<()> {
        let recommender = SimilarityRecommender::load(&args.artifact)?;
        let limit = args
            .limit
            .unwrap_or(self.config.chatlens.analysis.recommendation_limit);
        let recommendations = recommender.recommend(&args.title, limit)?;

        match args.format {
            OutputFormat::Json => println!(
                "{}",
                to_json(&serde_json::json!({
                    "success": true,
                    "recommendations": recommendations,
                }))?
            ),
            OutputFormat::Text => {
                for (rank, item) in recommendations.iter().enumerate() {
                    println!("{:>3}. {} ({:.3})", rank + 1, item.title, item.score);
                }
            }
        }
        Ok(())
    }

    fn handle_config(&self, args: &ConfigArgs) -> Result<()> {
        match &args.command {
            ConfigCommand::Init { path, force } => {
                let path = match path {
                    Some(path) => path.clone(),
                    None => ChatlensConfig::default_path()?,
                };
                if path.exists() && !force {
                    return Err(CliError::Command(format!(
                        "{} already exists, use --force to overwrite",
                        path.display()
                    )));
                }

                ChatlensConfig::from_system_dirs()
                    .unwrap_or_default()
                    .save(&path)?;
                println!("wrote {}", path.display());
                Ok(())
            }
            ConfigCommand::Show { format } => {
                let rendered = match format {
                    OutputFormat::Json => to_json(&self.config.chatlens)?,
                    OutputFormat::Text => toml::to_string_pretty(&self.config.chatlens)
                        .map_err(|e| CliError::Parse(e.to_string()))?,
                };
                if let Some(path) = &self.config.config_path {
                    debug!("Configuration loaded from {}", path.display());
                }
                println!("{}", rendered);
                Ok(())
            }
        }
    }
}

/// Map `-v` occurrences to a level. Without flags the level from a loaded
/// configuration file applies, otherwise warn.
fn log_level(verbosity: u8, configured: Option<LogLevel>) -> Level {
    match verbosity {
        0 => configured
            .map(|level| level.as_tracing_level())
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Parse(e.to_string()))
}

/// Render a report for the terminal.
fn render_report(report: &AnalysisReport) -> String {
    if report.is_empty() {
        return format!("{}\n", NO_MESSAGES_ERROR);
    }

    let mut out = String::new();
    out.push_str(&format!("Messages:        {}\n", report.total_messages));
    out.push_str(&format!("Most active:     {}\n", report.active_user_label()));
    out.push_str(&format!(
        "Avg length:      {:.2} chars\n",
        report.avg_message_length
    ));
    out.push_str(&format!("Words:           {}\n", report.total_words));
    out.push_str(&format!("Links:           {}\n", report.total_links));
    out.push_str(&format!("Emojis:          {}\n", report.total_emojis));

    out.push_str("\nMessages per sender\n");
    let width = report
        .per_sender_counts
        .iter()
        .map(|entry| entry.sender.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &report.per_sender_counts {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            entry.sender,
            entry.count,
            width = width
        ));
    }

    if !report.top_emojis.is_empty() {
        out.push_str("\nTop emojis\n");
        for entry in &report.top_emojis {
            out.push_str(&format!("  {}  {}\n", entry.emoji, entry.count));
        }
    }

    out.push_str("\nBusiest hours\n");
    for (hour, count) in report.hourly_distribution.iter().enumerate() {
        if *count > 0 {
            out.push_str(&format!("  {:02}:00  {}\n", hour, count));
        }
    }

    out.push_str("\nWeekdays\n");
    for (day, count) in WEEKDAY_NAMES.iter().zip(report.daily_distribution.iter()) {
        out.push_str(&format!("  {:<9}  {}\n", day, count));
    }

    out
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let app = App::new()?;
    app.run()
}
