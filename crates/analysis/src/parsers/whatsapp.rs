//! Line grammar for Android-style WhatsApp exports:
//! `DD/MM/YYYY, H:MM am - Sender: Body`.

use super::{MessageType, ParseStats, ParsedMessage};
use crate::config::AnalysisConfig;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// Some exporters put a narrow no-break space before the meridiem.
static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{2}/\d{2}/\d{4}), (\d{1,2}:\d{2}[ \x{202F}\x{00A0}]?(?i:am|pm)) - (.*)$",
    )
    .expect("header pattern")
});

static SENDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]+?): ?(.*)$").expect("sender pattern"));

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %I:%M %p";

/// Raw pieces of a header line, borrowed from the line itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader<'a> {
    /// Date as written, `DD/MM/YYYY`.
    pub date: &'a str,
    /// Time as written, `H:MM am`.
    pub time: &'a str,
    /// Text before the first colon, `None` for author-less notices.
    pub sender_raw: Option<&'a str>,
    /// Start of the body.
    pub body_fragment: &'a str,
}

/// Split a header line into date, time, sender and body.
///
/// This is the only place the header grammar is evaluated, so classifying a
/// line and extracting its fields can never disagree.
pub fn parse_header(line: &str) -> Option<MessageHeader<'_>> {
    let caps = HEADER_PATTERN.captures(line)?;
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let rest = caps.get(3)?.as_str();

    let (sender_raw, body_fragment) = match SENDER_PATTERN.captures(rest) {
        Some(sender_caps) => (
            Some(sender_caps.get(1)?.as_str()),
            sender_caps.get(2)?.as_str(),
        ),
        None => (None, rest),
    };

    Some(MessageHeader {
        date,
        time,
        sender_raw,
        body_fragment,
    })
}

/// Whether a line starts a new message record.
pub fn is_header_line(line: &str) -> bool {
    parse_header(line).is_some()
}

/// Parse the header's date and time, `None` if either is out of range.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let time = time.trim_end();
    let split = time.len().checked_sub(2)?;
    let clock = time.get(..split)?.trim_end();
    let meridiem = time.get(split..)?.to_ascii_uppercase();

    let normalized = format!("{}, {} {}", date.trim(), clock, meridiem);
    NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT).ok()
}

#[derive(Debug)]
struct PendingHeader {
    date: String,
    time: String,
    sender: Option<String>,
}

impl PendingHeader {
    fn from_header(header: &MessageHeader<'_>) -> Self {
        let sender = header
            .sender_raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            date: header.date.to_string(),
            time: header.time.to_string(),
            sender,
        }
    }
}

/// State machine that folds export lines into messages.
///
/// Each header line closes the buffered message and opens a new one; every
/// other line is appended to the open body verbatim.
#[derive(Debug)]
pub struct MessageAssembler<'c> {
    config: &'c AnalysisConfig,
    pending: Option<PendingHeader>,
    buffer: Vec<String>,
    stats: ParseStats,
}

impl<'c> MessageAssembler<'c> {
    /// Create an assembler with no open message.
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self {
            config,
            pending: None,
            buffer: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Feed one physical line. Returns the message this line completed, if any.
    pub fn push_line(&mut self, raw: &str) -> Option<ParsedMessage> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        self.stats.lines += 1;

        match parse_header(line) {
            Some(header) => {
                self.stats.header_lines += 1;
                let completed = self.flush();
                self.pending = Some(PendingHeader::from_header(&header));
                self.buffer.push(header.body_fragment.to_string());
                completed
            }
            None => {
                if self.pending.is_some() {
                    self.buffer.push(line.to_string());
                } else if !line.trim().is_empty() {
                    self.stats.orphan_lines += 1;
                }
                None
            }
        }
    }

    /// Close the stream, returning the last buffered message and the counters.
    pub fn finish(mut self) -> (Option<ParsedMessage>, ParseStats) {
        let last = self.flush();
        (last, self.stats)
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    fn flush(&mut self) -> Option<ParsedMessage> {
        let header = self.pending.take()?;
        let joined = self.buffer.join("\n");
        self.buffer.clear();

        let body = joined.trim();
        if self.config.is_placeholder(body) {
            self.stats.placeholders_dropped += 1;
            return None;
        }

        let timestamp = parse_timestamp(&header.date, &header.time);
        if timestamp.is_none() {
            self.stats.untimed_messages += 1;
            debug!("Unparsable timestamp: {}, {}", header.date, header.time);
        }

        let (sender, msg_type) = match header.sender {
            Some(sender) => (sender, MessageType::Text),
            None => (self.config.system_sender.clone(), MessageType::System),
        };

        Some(ParsedMessage {
            timestamp,
            sender,
            body: body.to_string(),
            msg_type,
        })
    }
}

/// Assemble every message of an export held in memory.
pub fn parse_messages(text: &str, config: &AnalysisConfig) -> Vec<ParsedMessage> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut assembler = MessageAssembler::new(config);
    let mut messages: Vec<ParsedMessage> = text
        .lines()
        .filter_map(|line| assembler.push_line(line))
        .collect();

    let (last, stats) = assembler.finish();
    messages.extend(last);
    debug!(
        "Assembled {} messages from {} lines ({} orphan, {} placeholders)",
        messages.len(),
        stats.lines,
        stats.orphan_lines,
        stats.placeholders_dropped
    );
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn header_line_splits_into_fields() {
        let header = parse_header("01/02/2023, 9:05 am - Alice: Hello there").unwrap();
        assert_eq!(header.date, "01/02/2023");
        assert_eq!(header.time, "9:05 am");
        assert_eq!(header.sender_raw, Some("Alice"));
        assert_eq!(header.body_fragment, "Hello there");
    }

    #[test]
    fn sender_stops_at_first_colon() {
        let header = parse_header("01/02/2023, 11:30 PM - Bob: ratio: 3:1").unwrap();
        assert_eq!(header.sender_raw, Some("Bob"));
        assert_eq!(header.body_fragment, "ratio: 3:1");
    }

    #[test]
    fn empty_body_still_starts_a_message() {
        let header = parse_header("01/02/2023, 9:05 am - Alice:").unwrap();
        assert_eq!(header.sender_raw, Some("Alice"));
        assert_eq!(header.body_fragment, "");
    }

    #[test]
    fn notice_without_author_has_no_sender() {
        let header = parse_header("01/02/2023, 9:05 am - Alice added Bob").unwrap();
        assert_eq!(header.sender_raw, None);
        assert_eq!(header.body_fragment, "Alice added Bob");
    }

    #[test]
    fn non_header_lines_are_rejected() {
        assert!(!is_header_line("world"));
        assert!(!is_header_line("1/2/2023, 9:05 am - Alice: short date"));
        assert!(!is_header_line("01/02/2023, 9:05 - Alice: no meridiem"));
        assert!(!is_header_line("  01/02/2023, 9:05 am - Alice: indented"));
        assert!(is_header_line("01/02/2023, 9:05\u{202f}pm - Alice: narrow space"));
    }

    #[test]
    fn timestamp_handles_meridiem_forms() {
        let ts = parse_timestamp("01/02/2023", "9:05 pm").unwrap();
        assert_eq!((ts.day(), ts.month(), ts.year()), (1, 2, 2023));
        assert_eq!((ts.hour(), ts.minute()), (21, 5));

        let midnight = parse_timestamp("01/02/2023", "12:10 AM").unwrap();
        assert_eq!(midnight.hour(), 0);

        let glued = parse_timestamp("01/02/2023", "7:00am").unwrap();
        assert_eq!(glued.hour(), 7);

        let narrow = parse_timestamp("01/02/2023", "7:00\u{202f}pm").unwrap();
        assert_eq!(narrow.hour(), 19);
    }

    #[test]
    fn invalid_dates_do_not_parse() {
        assert!(parse_timestamp("32/13/2023", "9:05 am").is_none());
        assert!(parse_timestamp("29/02/2023", "9:05 am").is_none());
        assert!(parse_timestamp("01/02/2023", "13:05 pm").is_none());
    }

    #[test]
    fn continuation_lines_join_with_newline() {
        let config = AnalysisConfig::default();
        let messages = parse_messages("01/02/2023, 9:05 am - Alice: Hello\nworld", &config);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "Alice");
        assert_eq!(messages[0].body, "Hello\nworld");
    }

    #[test]
    fn crlf_exports_parse_like_lf() {
        let config = AnalysisConfig::default();
        let text = "01/02/2023, 9:05 am - Alice: one\r\n01/02/2023, 9:06 am - Bob: two\r\n";
        let messages = parse_messages(text, &config);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "one");
        assert_eq!(messages[1].sender, "Bob");
    }

    #[test]
    fn placeholders_are_dropped_at_flush() {
        let config = AnalysisConfig::default();
        let text = "\
01/02/2023, 9:05 am - Alice: <Media omitted>
01/02/2023, 9:06 am - Bob:   This message was deleted  
01/02/2023, 9:07 am - Carol: kept";
        let mut assembler = MessageAssembler::new(&config);
        let mut messages: Vec<ParsedMessage> =
            text.lines().filter_map(|l| assembler.push_line(l)).collect();
        let (last, stats) = assembler.finish();
        messages.extend(last);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "Carol");
        assert_eq!(stats.placeholders_dropped, 2);
        assert_eq!(stats.header_lines, 3);
    }

    #[test]
    fn bad_timestamp_keeps_the_message() {
        let config = AnalysisConfig::default();
        let mut assembler = MessageAssembler::new(&config);
        assert!(assembler.push_line("32/13/2023, 9:05 am - Bob: hi").is_none());
        let (last, stats) = assembler.finish();
        let message = last.unwrap();
        assert_eq!(message.sender, "Bob");
        assert!(message.timestamp.is_none());
        assert_eq!(stats.untimed_messages, 1);
    }

    #[test]
    fn preamble_before_first_header_is_counted_not_emitted() {
        let config = AnalysisConfig::default();
        let mut assembler = MessageAssembler::new(&config);
        assert!(assembler.push_line("Chat export").is_none());
        assert!(assembler.push_line("").is_none());
        assert!(assembler
            .push_line("01/02/2023, 9:05 am - Alice: hi")
            .is_none());
        assert_eq!(assembler.stats().orphan_lines, 1);

        let (last, _) = assembler.finish();
        assert_eq!(last.unwrap().body, "hi");
    }

    #[test]
    fn author_less_notice_goes_to_system_bucket() {
        let config = AnalysisConfig::default();
        let text = "01/02/2023, 9:00 am - Messages are end-to-end encrypted\n\
                    01/02/2023, 9:05 am - Alice: hi";
        let messages = parse_messages(text, &config);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, config.system_sender);
        assert_eq!(messages[0].msg_type, MessageType::System);
        assert_eq!(messages[1].msg_type, MessageType::Text);
    }

    #[test]
    fn blank_sender_falls_back_to_system_bucket() {
        let config = AnalysisConfig::default();
        let messages = parse_messages("01/02/2023, 9:05 am -  : hello", &config);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, config.system_sender);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let config = AnalysisConfig::default();
        let messages = parse_messages("\u{feff}01/02/2023, 9:05 am - Alice: hi", &config);
        assert_eq!(messages.len(), 1);
    }
}
