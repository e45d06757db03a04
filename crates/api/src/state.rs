//! Shared state handed to every request handler.

use chatlens_analysis::{
    AnalysisConfig, Classifier, LinearTextClassifier, Recommender, SimilarityRecommender,
};
use chatlens_core::config::ModelConfig;
use std::sync::Arc;
use tracing::{error, info};

/// Read-only state shared by the API handlers.
///
/// Models are loaded once at startup. A model that failed to load stays
/// `None`, and the endpoints that need it answer with a server error.
#[derive(Clone)]
pub struct AppState {
    /// Settings used for every chat analysis.
    pub analysis: Arc<AnalysisConfig>,

    /// Spam classifier, if one was loaded.
    pub classifier: Option<Arc<dyn Classifier>>,

    /// Movie recommender, if one was loaded.
    pub recommender: Option<Arc<dyn Recommender>>,
}

impl AppState {
    /// Create state with no models loaded.
    pub fn new(analysis: AnalysisConfig) -> Self {
        Self {
            analysis: Arc::new(analysis),
            classifier: None,
            recommender: None,
        }
    }

    /// Attach a spam classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Attach a movie recommender.
    pub fn with_recommender(mut self, recommender: Arc<dyn Recommender>) -> Self {
        self.recommender = Some(recommender);
        self
    }

    /// Load whichever model artifacts are configured.
    ///
    /// Load failures are logged and leave the corresponding slot empty so the
    /// rest of the API keeps serving.
    pub fn load_models(mut self, models: &ModelConfig) -> Self {
        if let Some(path) = models.classifier_path.as_deref() {
            match LinearTextClassifier::load(path) {
                Ok(classifier) => {
                    info!("Loaded spam classifier from {}", path.display());
                    self.classifier = Some(Arc::new(classifier));
                }
                Err(e) => error!("Failed to load spam classifier {}: {}", path.display(), e),
            }
        }

        if let Some(path) = models.recommender_path.as_deref() {
            match SimilarityRecommender::load(path) {
                Ok(recommender) => {
                    info!(
                        "Loaded recommender from {} ({} titles)",
                        path.display(),
                        recommender.len()
                    );
                    self.recommender = Some(Arc::new(recommender));
                }
                Err(e) => error!("Failed to load recommender {}: {}", path.display(), e),
            }
        }

        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analysis", &self.analysis)
            .field("classifier", &self.classifier.is_some())
            .field("recommender", &self.recommender.is_some())
            .finish()
    }
}
