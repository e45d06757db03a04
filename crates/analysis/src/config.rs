use chatlens_core::constants::{
    DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_TOP_EMOJI_LIMIT, DELETED_MESSAGE_BODY,
    MEDIA_OMITTED_BODY, SYSTEM_SENDER,
};
use chatlens_core::ChatlensConfig;
use serde::{Deserialize, Serialize};

/// Configuration for chat export analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of entries in the emoji ranking, never above five
    pub top_emoji_limit: usize,

    /// Message bodies that mark media or deleted content.
    ///
    /// Compared against the trimmed body; matching messages are dropped
    /// before any statistic sees them.
    pub placeholder_bodies: Vec<String>,

    /// Sender bucket for header lines that carry no author
    pub system_sender: String,

    /// Default number of titles returned by a recommender
    pub recommendation_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_emoji_limit: DEFAULT_TOP_EMOJI_LIMIT,
            placeholder_bodies: vec![
                MEDIA_OMITTED_BODY.to_string(),
                DELETED_MESSAGE_BODY.to_string(),
            ],
            system_sender: SYSTEM_SENDER.to_string(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl AnalysisConfig {
    /// Create analysis configuration from core ChatLens configuration.
    pub fn from_core_config(core_config: &ChatlensConfig) -> Self {
        let settings = &core_config.analysis;
        let mut config = Self {
            top_emoji_limit: settings.top_emoji_limit.min(DEFAULT_TOP_EMOJI_LIMIT),
            placeholder_bodies: settings.placeholder_bodies.clone(),
            system_sender: settings.system_sender.trim().to_string(),
            recommendation_limit: settings.recommendation_limit,
        };

        if config.system_sender.is_empty() {
            config.system_sender = SYSTEM_SENDER.to_string();
        }

        config
    }

    /// Override the emoji ranking size, capped at the default of five.
    pub fn with_top_emoji_limit(mut self, limit: usize) -> Self {
        self.top_emoji_limit = limit.min(DEFAULT_TOP_EMOJI_LIMIT);
        self
    }

    /// Whether a trimmed body is one of the configured placeholders.
    pub fn is_placeholder(&self, body: &str) -> bool {
        self.placeholder_bodies.iter().any(|p| p == body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_settings_carry_over() {
        let mut core = ChatlensConfig::default();
        core.analysis.top_emoji_limit = 8;
        core.analysis.placeholder_bodies.push("image omitted".to_string());
        core.analysis.system_sender = "  ".to_string();

        let config = AnalysisConfig::from_core_config(&core);
        assert_eq!(config.top_emoji_limit, DEFAULT_TOP_EMOJI_LIMIT);
        assert!(config.is_placeholder("image omitted"));
        assert!(config.is_placeholder("<Media omitted>"));
        assert_eq!(config.system_sender, SYSTEM_SENDER);
    }

    #[test]
    fn emoji_ranking_override_is_capped() {
        let config = AnalysisConfig::default().with_top_emoji_limit(2);
        assert_eq!(config.top_emoji_limit, 2);

        let config = AnalysisConfig::default().with_top_emoji_limit(12);
        assert_eq!(config.top_emoji_limit, DEFAULT_TOP_EMOJI_LIMIT);
    }

    #[test]
    fn placeholder_match_is_exact() {
        let config = AnalysisConfig::default();
        assert!(config.is_placeholder("This message was deleted"));
        assert!(!config.is_placeholder("This message was deleted!"));
        assert!(!config.is_placeholder("<media omitted>"));
    }
}
