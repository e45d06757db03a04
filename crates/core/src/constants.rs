//! Application constants and configuration defaults.

/// Default HTTP server port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default API base path.
pub const DEFAULT_API_BASE_PATH: &str = "/api";

/// Maximum accepted size of an uploaded chat export (16 MB).
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Number of emoji kept in the ranking of a report.
pub const DEFAULT_TOP_EMOJI_LIMIT: usize = 5;

/// Number of titles returned by a recommendation lookup.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Sender bucket for header lines without a `name:` prefix.
pub const SYSTEM_SENDER: &str = "System";

/// Export body written in place of an attachment.
pub const MEDIA_OMITTED_BODY: &str = "<Media omitted>";

/// Export body written in place of a deleted message.
pub const DELETED_MESSAGE_BODY: &str = "This message was deleted";

/// Display value for the active user of an empty report.
pub const NO_ACTIVE_USER: &str = "N/A";

/// Error text returned when an export has no header lines.
pub const NO_MESSAGES_ERROR: &str = "No recognizable messages found.";

/// Weekday labels, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
