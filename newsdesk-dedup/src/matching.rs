//! Title and URL normalization and truncation-tolerant matching.
//!
//! Normalization is deliberately conservative. Titles keep their
//! punctuation and non-Latin script untouched; aggressive stripping made
//! distinct headlines collide in practice. When a feed URL participates in
//! the decision, the title only breaks ties, so it must not be flattened.

use url::{Position, Url};

/// Minimum (character) length of the shorter normalized title for any
/// match to count. Shorter titles are too generic to be meaningful.
pub const MIN_TITLE_MATCH_LEN: usize = 10;

/// Minimum (character) length of the shorter normalized title for a
/// prefix relationship to count as a truncated match.
pub const TRUNCATION_PREFIX_MIN_LEN: usize = 20;

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes a title for comparison: trim, lowercase, collapse internal
/// whitespace runs to a single space. Idempotent.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a URL for comparison: drop query string and fragment,
/// lowercase the rest. Unparseable input falls back to lowercase+trim of
/// the raw string.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed[..Position::BeforeQuery].to_lowercase(),
        Err(_) => url.trim().to_lowercase(),
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Truncation-tolerant equality over two normalized titles.
///
/// Matches when the titles are identical, or when the shorter one (longer
/// than [`TRUNCATION_PREFIX_MIN_LEN`] characters) is a prefix of the longer
/// one; upstream surfaces truncate long headlines. Either way the shorter
/// title must exceed [`MIN_TITLE_MATCH_LEN`] characters.
pub fn titles_match(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shorter_chars = shorter.chars().count();
    if shorter_chars <= MIN_TITLE_MATCH_LEN {
        return false;
    }
    if a == b {
        return true;
    }
    shorter_chars > TRUNCATION_PREFIX_MIN_LEN && longer.starts_with(shorter)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_collapses_whitespace() {
        assert_eq!(
            normalize_title("  Markets   Rally \t as\nRates Fall  "),
            "markets rally as rates fall"
        );
    }

    #[test]
    fn test_normalize_title_is_idempotent() {
        let once = normalize_title("  Breaking:   OIL Prices   SURGE  ");
        assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn test_normalize_title_keeps_punctuation_and_non_latin() {
        assert_eq!(normalize_title("قیمت نفت: افزایش ۵٪!"), "قیمت نفت: افزایش ۵٪!");
    }

    #[test]
    fn test_normalize_url_drops_query_and_fragment() {
        assert_eq!(
            normalize_url("https://News.Example.com/Story/1?utm_source=rss#top"),
            "https://news.example.com/story/1"
        );
    }

    #[test]
    fn test_normalize_url_keeps_port() {
        assert_eq!(
            normalize_url("http://example.com:8080/a?x=1"),
            "http://example.com:8080/a"
        );
    }

    #[test]
    fn test_normalize_url_falls_back_on_parse_failure() {
        assert_eq!(normalize_url("  Not A Url  "), "not a url");
    }

    #[test]
    fn test_exact_titles_match() {
        assert!(titles_match(
            "markets rally as rates fall",
            "markets rally as rates fall"
        ));
    }

    #[test]
    fn test_truncated_title_matches_when_long_enough() {
        let full = "markets rally as rates fall across european exchanges";
        let truncated = "markets rally as rates fall";
        assert!(titles_match(truncated, full));
        assert!(titles_match(full, truncated));
    }

    #[test]
    fn test_short_prefix_does_not_match() {
        // Shorter side is a prefix but only 14 characters, under the
        // truncation threshold.
        assert!(!titles_match("markets rally", "markets rally as rates fall"));
    }

    #[test]
    fn test_tiny_titles_never_match() {
        assert!(!titles_match("breaking", "breaking"));
        assert!(!titles_match("", ""));
    }

    #[test]
    fn test_non_prefix_overlap_does_not_match() {
        assert!(!titles_match(
            "markets rally as rates fall",
            "european markets rally as rates fall"
        ));
    }
}
