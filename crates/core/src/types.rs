use serde::{Deserialize, Serialize};
use std::fmt;

/// Label produced by a text classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamLabel {
    /// Unsolicited or fraudulent text.
    Spam,

    /// Legitimate text.
    Ham,
}

impl SpamLabel {
    /// Map a binary prediction (`true` = positive class) onto a label.
    pub fn from_prediction(is_spam: bool) -> Self {
        if is_spam {
            SpamLabel::Spam
        } else {
            SpamLabel::Ham
        }
    }

    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamLabel::Spam => "spam",
            SpamLabel::Ham => "ham",
        }
    }
}

impl fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ranked entry returned by a recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended title.
    pub title: String,

    /// Similarity score against the queried title.
    pub score: f64,
}
