//! The analysis report and the JSON shape it is served in.

use crate::parsers::ParseStats;
use chatlens_core::constants::{NO_ACTIVE_USER, NO_MESSAGES_ERROR, WEEKDAY_NAMES};
use serde::{Serialize, Serializer};

/// Message count for one sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderCount {
    /// Sender name.
    pub sender: String,
    /// Messages attributed to the sender.
    pub count: u64,
}

/// Occurrences of one emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiCount {
    /// Single emoji character.
    pub emoji: String,
    /// Occurrences across all counted messages.
    pub count: u64,
}

/// Per-author totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderStats {
    /// Sender name.
    pub sender: String,
    /// Messages sent.
    pub messages: u64,
    /// Words across all messages.
    pub words: u64,
    /// Mean words per message.
    pub avg_words: f64,
    /// Emoji characters sent.
    pub emojis: u64,
    /// Links shared.
    pub links: u64,
}

/// Statistics for one chat export.
///
/// `per_sender_counts` sums to `total_messages`; the hour and weekday
/// histograms only include messages with a parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Counted messages (placeholders excluded).
    pub total_messages: u64,
    /// Descending by count, ties in order of first appearance.
    pub per_sender_counts: Vec<SenderCount>,
    /// Sender with the most messages.
    pub active_user: Option<String>,
    /// Mean body length in characters.
    pub avg_message_length: f64,
    /// Links across all messages.
    pub total_links: u64,
    /// Most used emoji, descending, ties in order of first encounter.
    pub top_emojis: Vec<EmojiCount>,
    /// Index 0 is midnight.
    pub hourly_distribution: [u64; 24],
    /// Index 0 is Monday.
    pub daily_distribution: [u64; 7],
    /// Words across all messages.
    pub total_words: u64,
    /// Emoji characters across all messages.
    pub total_emojis: u64,
    /// Per-author totals in the order of `per_sender_counts`.
    pub sender_stats: Vec<SenderStats>,
    /// Assembly counters.
    pub parse_stats: ParseStats,
}

impl AnalysisReport {
    /// No header line was recognized (or every message was a placeholder).
    pub fn is_empty(&self) -> bool {
        self.total_messages == 0
    }

    /// Messages that landed in the hour histogram.
    pub fn timed_messages(&self) -> u64 {
        self.hourly_distribution.iter().sum()
    }

    /// Active user, or `"N/A"` for an empty report.
    pub fn active_user_label(&self) -> &str {
        self.active_user.as_deref().unwrap_or(NO_ACTIVE_USER)
    }

    /// Build the response served at the API boundary.
    pub fn to_response(&self) -> AnalysisResponse {
        if self.is_empty() {
            return AnalysisResponse::Failure(FailurePayload {
                success: false,
                error: NO_MESSAGES_ERROR.to_string(),
            });
        }

        AnalysisResponse::Success(ReportPayload {
            success: true,
            total_messages: self.total_messages,
            active_user: self.active_user_label().to_string(),
            message_count: self.per_sender_counts.clone(),
            avg_msg_length: round_to(self.avg_message_length, 2),
            total_links: self.total_links,
            top_emojis: self.top_emojis.clone(),
            hourly_distribution: self
                .hourly_distribution
                .iter()
                .enumerate()
                .map(|(hour, &count)| HourBucket {
                    hour: hour as u32,
                    count,
                })
                .collect(),
            daily_distribution: WEEKDAY_NAMES
                .iter()
                .zip(self.daily_distribution.iter())
                .map(|(day, &count)| DayBucket {
                    day: (*day).to_string(),
                    count,
                })
                .collect(),
            total_words: self.total_words,
            total_emojis: self.total_emojis,
            member_stats: self
                .sender_stats
                .iter()
                .map(|stats| SenderStats {
                    avg_words: round_to(stats.avg_words, 2),
                    ..stats.clone()
                })
                .collect(),
        })
    }
}

/// Either a full report or the explicit "no messages" outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    /// At least one message was counted.
    Success(ReportPayload),
    /// Nothing recognizable in the export.
    Failure(FailurePayload),
}

impl AnalysisResponse {
    /// Whether this is a real analysis result.
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success(_))
    }
}

/// Successful analysis in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    /// Always `true`.
    pub success: bool,
    /// Counted messages.
    pub total_messages: u64,
    /// Sender with the most messages.
    pub active_user: String,
    /// Serialized as an object whose keys keep ranking order.
    #[serde(serialize_with = "serialize_sender_counts")]
    pub message_count: Vec<SenderCount>,
    /// Mean body length, two decimals.
    pub avg_msg_length: f64,
    /// Links across all messages.
    pub total_links: u64,
    /// At most the configured number of emoji.
    pub top_emojis: Vec<EmojiCount>,
    /// 24 buckets, hour 0 first.
    pub hourly_distribution: Vec<HourBucket>,
    /// 7 buckets, Monday first.
    pub daily_distribution: Vec<DayBucket>,
    /// Words across all messages.
    pub total_words: u64,
    /// Emoji characters across all messages.
    pub total_emojis: u64,
    /// Per-author totals.
    pub member_stats: Vec<SenderStats>,
}

/// Failed analysis in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailurePayload {
    /// Always `false`.
    pub success: bool,
    /// Human-readable reason.
    pub error: String,
}

/// One entry of the hour histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// Hour of day, 0..=23.
    pub hour: u32,
    /// Messages sent during that hour.
    pub count: u64,
}

/// One entry of the weekday histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    /// English weekday name.
    pub day: String,
    /// Messages sent on that weekday.
    pub count: u64,
}

fn serialize_sender_counts<S>(counts: &[SenderCount], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(counts.iter().map(|c| (c.sender.as_str(), c.count)))
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> AnalysisReport {
        AnalysisReport {
            total_messages: 0,
            per_sender_counts: Vec::new(),
            active_user: None,
            avg_message_length: 0.0,
            total_links: 0,
            top_emojis: Vec::new(),
            hourly_distribution: [0; 24],
            daily_distribution: [0; 7],
            total_words: 0,
            total_emojis: 0,
            sender_stats: Vec::new(),
            parse_stats: ParseStats::default(),
        }
    }

    #[test]
    fn empty_report_serializes_as_failure() {
        let response = empty_report().to_response();
        assert!(!response.is_success());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "No recognizable messages found." })
        );
    }

    #[test]
    fn message_count_keeps_ranking_order() {
        let mut report = empty_report();
        report.total_messages = 5;
        report.active_user = Some("Zoe".to_string());
        report.per_sender_counts = vec![
            SenderCount {
                sender: "Zoe".to_string(),
                count: 3,
            },
            SenderCount {
                sender: "Adam".to_string(),
                count: 2,
            },
        ];

        let json = serde_json::to_string(&report.to_response()).unwrap();
        assert!(json.contains(r#""messageCount":{"Zoe":3,"Adam":2}"#));
        assert!(json.contains(r#""activeUser":"Zoe""#));
    }

    #[test]
    fn averages_are_rounded_to_two_decimals() {
        let mut report = empty_report();
        report.total_messages = 3;
        report.avg_message_length = 10.0 / 3.0;

        let json = serde_json::to_value(report.to_response()).unwrap();
        assert_eq!(json["avgMsgLength"], serde_json::json!(3.33));
        assert_eq!(json["hourlyDistribution"].as_array().unwrap().len(), 24);
        assert_eq!(json["dailyDistribution"][0]["day"], "Monday");
        assert_eq!(json["dailyDistribution"][6]["day"], "Sunday");
    }
}
