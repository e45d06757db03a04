//! Pure per-message measurements: emoji, links, characters and words.

use once_cell::sync::Lazy;
use regex::Regex;

// Emoticons, misc symbols & pictographs, transport & map, supplemental
// symbols & pictographs, symbols & pictographs extended-A, regional
// indicators, misc symbols, dingbats.
static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[",
        r"\x{1F600}-\x{1F64F}",
        r"\x{1F300}-\x{1F5FF}",
        r"\x{1F680}-\x{1F6FF}",
        r"\x{1F900}-\x{1F9FF}",
        r"\x{1FA70}-\x{1FAFF}",
        r"\x{1F1E6}-\x{1F1FF}",
        r"\x{2600}-\x{26FF}",
        r"\x{2700}-\x{27BF}",
        r"]+",
    ))
    .expect("emoji pattern")
});

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("url pattern"));

/// Individual emoji characters in order of appearance.
///
/// Runs such as `"😀😀"` are split so each character counts once.
pub fn extract_emojis(body: &str) -> Vec<&str> {
    EMOJI_PATTERN
        .find_iter(body)
        .flat_map(|run| {
            let run = run.as_str();
            run.char_indices()
                .map(move |(start, c)| &run[start..start + c.len_utf8()])
        })
        .collect()
}

/// Every `http://` or `https://` token, duplicates included.
pub fn extract_urls(body: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(body).map(|m| m.as_str()).collect()
}

/// Unicode scalar values in the trimmed body.
pub fn char_count(body: &str) -> usize {
    body.trim().chars().count()
}

/// Whitespace-separated words.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// All analyzer outputs for one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMetrics<'a> {
    /// See [`char_count`].
    pub char_count: usize,
    /// See [`word_count`].
    pub word_count: usize,
    /// See [`extract_emojis`].
    pub emojis: Vec<&'a str>,
    /// See [`extract_urls`].
    pub urls: Vec<&'a str>,
}

impl<'a> ContentMetrics<'a> {
    /// Run every analyzer over `body`.
    pub fn measure(body: &'a str) -> Self {
        Self {
            char_count: char_count(body),
            word_count: word_count(body),
            emojis: extract_emojis(body),
            urls: extract_urls(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_runs_are_split_into_characters() {
        assert_eq!(extract_emojis("😀😀 great"), vec!["😀", "😀"]);
        assert_eq!(extract_emojis("ok 🚀 then 🎉🔥"), vec!["🚀", "🎉", "🔥"]);
    }

    #[test]
    fn plain_text_has_no_emoji() {
        assert!(extract_emojis("just words, 123 & punctuation!").is_empty());
        assert!(extract_emojis("").is_empty());
    }

    #[test]
    fn symbol_blocks_count_as_emoji() {
        assert_eq!(extract_emojis("sun ☀ and ✂"), vec!["☀", "✂"]);
    }

    #[test]
    fn repeated_links_count_twice() {
        let body = "see https://a.example/x and http://b.example then https://a.example/x";
        assert_eq!(
            extract_urls(body),
            vec!["https://a.example/x", "http://b.example", "https://a.example/x"]
        );
        assert!(extract_urls("ftp://nope.example www.example.com").is_empty());
    }

    #[test]
    fn counts_use_characters_not_bytes() {
        assert_eq!(char_count("  héllo  "), 5);
        assert_eq!(char_count("😀😀"), 2);
        assert_eq!(word_count("  two\nwords  "), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn measure_bundles_all_analyzers() {
        let metrics = ContentMetrics::measure("hi 👋 https://x.example");
        assert_eq!(metrics.char_count, 22);
        assert_eq!(metrics.word_count, 3);
        assert_eq!(metrics.emojis, vec!["👋"]);
        assert_eq!(metrics.urls.len(), 1);
    }
}
