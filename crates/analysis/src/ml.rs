//! Opaque model capabilities backed by artifacts from the offline pipeline.
//!
//! Nothing here trains or vectorizes: the artifacts are loaded as-is and
//! only looked up.

use crate::error::{AnalysisError, AnalysisResult};
use crate::report::round_to;
use chatlens_core::{Recommendation, SpamLabel};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("token regex"));

/// Binary text classifier (spam or ham).
pub trait Classifier: Send + Sync {
    /// Label a piece of text.
    fn classify(&self, text: &str) -> AnalysisResult<SpamLabel>;
}

/// Title-to-titles recommender.
pub trait Recommender: Send + Sync {
    /// Titles most similar to `title`, best first, at most `limit` entries.
    fn recommend(&self, title: &str, limit: usize) -> AnalysisResult<Vec<Recommendation>>;
}

/// On-disk form of [`LinearTextClassifier`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    /// Score before any token contributes.
    #[serde(default)]
    pub bias: f64,
    /// Scores strictly above this are spam.
    #[serde(default)]
    pub threshold: f64,
    /// Per-token contribution, keyed by lower-case token.
    pub weights: HashMap<String, f64>,
}

/// Bag-of-words linear scorer.
#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    bias: f64,
    threshold: f64,
    weights: HashMap<String, f64>,
}

impl LinearTextClassifier {
    /// Validate an artifact and build the classifier.
    pub fn from_artifact(artifact: LinearModelArtifact) -> AnalysisResult<Self> {
        if !artifact.bias.is_finite() || !artifact.threshold.is_finite() {
            return Err(AnalysisError::ModelLoading(
                "bias and threshold must be finite".to_string(),
            ));
        }

        let mut weights = HashMap::with_capacity(artifact.weights.len());
        for (token, weight) in artifact.weights {
            if !weight.is_finite() {
                return Err(AnalysisError::ModelLoading(format!(
                    "weight for token '{}' is not finite",
                    token
                )));
            }
            *weights.entry(token.to_lowercase()).or_insert(0.0) += weight;
        }

        Ok(Self {
            bias: artifact.bias,
            threshold: artifact.threshold,
            weights,
        })
    }

    /// Load a JSON artifact from disk.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ModelLoading(format!("cannot read {}: {}", path.display(), e))
        })?;
        let artifact: LinearModelArtifact = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::ModelLoading(format!("invalid classifier artifact: {}", e))
        })?;
        let classifier = Self::from_artifact(artifact)?;
        info!(
            "Loaded spam classifier from {} ({} tokens)",
            path.display(),
            classifier.weights.len()
        );
        Ok(classifier)
    }

    /// Raw linear score of `text`.
    pub fn score(&self, text: &str) -> f64 {
        TOKEN_PATTERN
            .find_iter(text)
            .filter_map(|token| self.weights.get(&token.as_str().to_lowercase()))
            .fold(self.bias, |acc, weight| acc + weight)
    }
}

impl Classifier for LinearTextClassifier {
    fn classify(&self, text: &str) -> AnalysisResult<SpamLabel> {
        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("No text provided".to_string()));
        }
        Ok(SpamLabel::from_prediction(self.score(text) > self.threshold))
    }
}

/// On-disk form of [`SimilarityRecommender`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityArtifact {
    /// Titles, one per matrix row.
    pub titles: Vec<String>,
    /// Square pairwise similarity matrix.
    pub similarity: Vec<Vec<f64>>,
}

/// Lookup over a precomputed similarity matrix.
#[derive(Debug, Clone)]
pub struct SimilarityRecommender {
    titles: Vec<String>,
    folded_titles: Vec<String>,
    similarity: Vec<Vec<f64>>,
}

impl SimilarityRecommender {
    /// Validate an artifact and build the recommender.
    pub fn from_artifact(artifact: SimilarityArtifact) -> AnalysisResult<Self> {
        let n = artifact.titles.len();
        if artifact.similarity.len() != n {
            return Err(AnalysisError::ModelLoading(format!(
                "similarity matrix has {} rows for {} titles",
                artifact.similarity.len(),
                n
            )));
        }
        for (i, row) in artifact.similarity.iter().enumerate() {
            if row.len() != n {
                return Err(AnalysisError::ModelLoading(format!(
                    "similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(AnalysisError::ModelLoading(format!(
                    "similarity row {} contains a non-finite score",
                    i
                )));
            }
        }

        let folded_titles = artifact.titles.iter().map(|t| t.to_lowercase()).collect();
        Ok(Self {
            titles: artifact.titles,
            folded_titles,
            similarity: artifact.similarity,
        })
    }

    /// Load a JSON artifact from disk.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ModelLoading(format!("cannot read {}: {}", path.display(), e))
        })?;
        let artifact: SimilarityArtifact = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::ModelLoading(format!("invalid recommender artifact: {}", e))
        })?;
        let recommender = Self::from_artifact(artifact)?;
        info!(
            "Loaded recommender from {} ({} titles)",
            path.display(),
            recommender.titles.len()
        );
        Ok(recommender)
    }

    /// Number of known titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the artifact had no titles.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    fn position(&self, title: &str) -> Option<usize> {
        let wanted = title.trim().to_lowercase();
        self.folded_titles.iter().position(|t| *t == wanted)
    }
}

impl Recommender for SimilarityRecommender {
    fn recommend(&self, title: &str, limit: usize) -> AnalysisResult<Vec<Recommendation>> {
        if title.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("No title provided".to_string()));
        }
        let idx = self
            .position(title)
            .ok_or_else(|| AnalysisError::NotFound(format!("Movie '{}' not found", title.trim())))?;

        let mut ranked: Vec<(usize, f64)> = self.similarity[idx]
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);

        Ok(ranked
            .into_iter()
            .map(|(i, score)| Recommendation {
                title: self.titles[i].clone(),
                score: round_to(score, 3),
            })
            .collect())
    }
}
