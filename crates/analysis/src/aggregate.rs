//! Single-pass fold of parsed messages into an [`AnalysisReport`].

use crate::config::AnalysisConfig;
use crate::content::ContentMetrics;
use crate::error::{AnalysisError, AnalysisResult};
use crate::parsers::{MessageAssembler, ParseStats, ParsedMessage};
use crate::report::{AnalysisReport, EmojiCount, SenderCount, SenderStats};
use chatlens_core::constants::DEFAULT_TOP_EMOJI_LIMIT;
use chrono::{Datelike, Timelike};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use tracing::{debug, info};

/// Counter whose iteration order is the order keys were first seen.
///
/// The hash map only stores slot indices into `entries`, so ranking with a
/// stable sort resolves ties by first appearance.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`, returning its new count.
    pub fn increment<Q>(&mut self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.add(key, 1)
    }

    /// Add `amount` occurrences of `key`, returning its new count.
    pub fn add<Q>(&mut self, key: &Q, amount: u64) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].1 += amount;
            return self.entries[slot].1;
        }

        let owned = key.to_owned();
        self.index.insert(owned.clone(), self.entries.len());
        self.entries.push((owned, amount));
        amount
    }

    /// Current count for `key`.
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key was ever counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Entries by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The first `limit` entries of [`FrequencyTable::ranked`].
    pub fn top(&self, limit: usize) -> Vec<(K, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        ranked
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SenderTotals {
    words: u64,
    emojis: u64,
    links: u64,
}

/// Accumulates report counters one message at a time.
///
/// Messages are folded in arrival order; nothing is re-sorted before
/// aggregation.
#[derive(Debug)]
pub struct Aggregator {
    top_emoji_limit: usize,
    senders: FrequencyTable<String>,
    sender_totals: HashMap<String, SenderTotals>,
    emojis: FrequencyTable<String>,
    total_messages: u64,
    total_chars: u64,
    total_words: u64,
    total_links: u64,
    hourly: [u64; 24],
    daily: [u64; 7],
}

impl Aggregator {
    /// Create an aggregator with every counter at zero.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            top_emoji_limit: config.top_emoji_limit.min(DEFAULT_TOP_EMOJI_LIMIT),
            senders: FrequencyTable::new(),
            sender_totals: HashMap::new(),
            emojis: FrequencyTable::new(),
            total_messages: 0,
            total_chars: 0,
            total_words: 0,
            total_links: 0,
            hourly: [0; 24],
            daily: [0; 7],
        }
    }

    /// Fold one message into the counters.
    pub fn add(&mut self, message: &ParsedMessage) {
        let metrics = ContentMetrics::measure(&message.body);

        self.total_messages += 1;
        self.senders.increment(message.sender.as_str());
        self.total_chars += metrics.char_count as u64;
        self.total_words += metrics.word_count as u64;
        self.total_links += metrics.urls.len() as u64;

        for emoji in &metrics.emojis {
            self.emojis.increment(*emoji);
        }

        let totals = self
            .sender_totals
            .entry(message.sender.clone())
            .or_default();
        totals.words += metrics.word_count as u64;
        totals.emojis += metrics.emojis.len() as u64;
        totals.links += metrics.urls.len() as u64;

        if let Some(timestamp) = message.timestamp {
            self.hourly[timestamp.hour() as usize] += 1;
            self.daily[timestamp.weekday().num_days_from_monday() as usize] += 1;
        }
    }

    /// Messages folded so far.
    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    /// Produce the report. `parse_stats` comes from the assembler.
    pub fn finish(self, parse_stats: ParseStats) -> AnalysisReport {
        let per_sender_counts: Vec<SenderCount> = self
            .senders
            .ranked()
            .into_iter()
            .map(|(sender, count)| SenderCount { sender, count })
            .collect();

        let active_user = per_sender_counts.first().map(|c| c.sender.clone());

        let avg_message_length = if self.total_messages > 0 {
            self.total_chars as f64 / self.total_messages as f64
        } else {
            0.0
        };

        let sender_stats = per_sender_counts
            .iter()
            .map(|entry| {
                let totals = self
                    .sender_totals
                    .get(&entry.sender)
                    .copied()
                    .unwrap_or_default();
                SenderStats {
                    sender: entry.sender.clone(),
                    messages: entry.count,
                    words: totals.words,
                    avg_words: if entry.count > 0 {
                        totals.words as f64 / entry.count as f64
                    } else {
                        0.0
                    },
                    emojis: totals.emojis,
                    links: totals.links,
                }
            })
            .collect();

        let top_emojis = self
            .emojis
            .top(self.top_emoji_limit)
            .into_iter()
            .map(|(emoji, count)| EmojiCount { emoji, count })
            .collect();

        AnalysisReport {
            total_messages: self.total_messages,
            per_sender_counts,
            active_user,
            avg_message_length,
            total_links: self.total_links,
            top_emojis,
            hourly_distribution: self.hourly,
            daily_distribution: self.daily,
            total_words: self.total_words,
            total_emojis: self.emojis.total(),
            sender_stats,
            parse_stats,
        }
    }
}

/// Analyze an export held in memory.
///
/// Messages stream from the assembler straight into the aggregator, so no
/// intermediate message list is built.
pub fn analyze_str(text: &str, config: &AnalysisConfig) -> AnalysisReport {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut assembler = MessageAssembler::new(config);
    let mut aggregator = Aggregator::new(config);

    for line in text.lines() {
        if let Some(message) = assembler.push_line(line) {
            aggregator.add(&message);
        }
    }

    let (last, stats) = assembler.finish();
    if let Some(message) = last {
        aggregator.add(&message);
    }

    debug!(
        "Parse stats: lines={} headers={} orphan={} untimed={} placeholders={}",
        stats.lines,
        stats.header_lines,
        stats.orphan_lines,
        stats.untimed_messages,
        stats.placeholders_dropped
    );

    let report = aggregator.finish(stats);
    if report.is_empty() {
        info!("No recognizable messages in export ({} lines)", stats.lines);
    } else {
        info!(
            "Analyzed {} messages from {} senders",
            report.total_messages,
            report.per_sender_counts.len()
        );
    }
    report
}

/// Decode `bytes` as UTF-8 and analyze them.
pub fn analyze_bytes(bytes: &[u8], config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        AnalysisError::Decode(format!(
            "chat export is not valid UTF-8 (byte {}): {}",
            e.valid_up_to(),
            e
        ))
    })?;
    Ok(analyze_str(text, config))
}

/// Read an export from disk and analyze it.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let bytes = std::fs::read(path)?;
    analyze_bytes(&bytes, config)
}
