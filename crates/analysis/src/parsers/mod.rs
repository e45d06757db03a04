use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// WhatsApp plain-text export grammar and message assembly.
pub mod whatsapp;

pub use whatsapp::{is_header_line, parse_header, parse_messages, MessageAssembler, MessageHeader};

/// A parsed message from a chat export.
///
/// Created once when the assembler sees the next header line (or the end of
/// the export) and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Local wall-clock time of the message, if the header's date and time parsed.
    pub timestamp: Option<NaiveDateTime>,
    /// Trimmed author name, or the system bucket for author-less notices.
    pub sender: String,
    /// Trimmed body; continuation lines are joined with `\n`.
    pub body: String,
    /// Type of message.
    pub msg_type: MessageType,
}

/// Type of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    /// Message written by a participant.
    Text,
    /// Notice without an author (joins, subject changes, encryption banner).
    System,
}

/// Counters for lines the assembler could not attribute cleanly.
///
/// These are logged but never surfaced per line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Physical lines consumed.
    pub lines: u64,
    /// Lines that started a new record.
    pub header_lines: u64,
    /// Non-empty lines seen before the first header.
    pub orphan_lines: u64,
    /// Emitted messages whose timestamp could not be parsed.
    pub untimed_messages: u64,
    /// Messages dropped because their body was a placeholder.
    pub placeholders_dropped: u64,
}
