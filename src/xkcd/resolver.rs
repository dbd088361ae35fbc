use regex::Regex;
use std::sync::LazyLock;

// Checked in order; the first pattern that matches anywhere wins.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"xkcd\.com/([0-9]+)").expect("valid regex"),
        Regex::new(r"#([0-9]+)").expect("valid regex"),
        Regex::new(r"\b([0-9]+)\b").expect("valid regex"),
    ]
});

/// Pulls a comic number out of free-form text such as `https://xkcd.com/327/`,
/// `#327` or `show comic 327`. `None` means "use the latest comic".
///
/// Numbers too large for `u32` saturate, so the fetch still targets a
/// numbered comic and fails upstream instead of silently showing the latest.
pub fn extract_comic_number(text: &str) -> Option<u32> {
    let digits = PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text).and_then(|caps| caps.get(1)))?;
    Some(digits.as_str().parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(extract_comic_number("https://xkcd.com/327/"), Some(327));
        assert_eq!(extract_comic_number("http://xkcd.com/327"), Some(327));
        assert_eq!(extract_comic_number("xkcd.com/2000"), Some(2000));
    }

    #[test]
    fn test_hash_number() {
        assert_eq!(extract_comic_number("#150"), Some(150));
        assert_eq!(extract_comic_number("show me #42 please"), Some(42));
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(extract_comic_number("show comic 2000"), Some(2000));
        assert_eq!(extract_comic_number("1234"), Some(1234));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(extract_comic_number("show me the latest"), None);
        assert_eq!(extract_comic_number(""), None);
        assert_eq!(extract_comic_number("abc123def"), None);
    }

    #[test]
    fn test_pattern_priority_beats_position() {
        assert_eq!(extract_comic_number("comic 12 is xkcd.com/327"), Some(327));
        assert_eq!(extract_comic_number("between 5 and #99"), Some(99));
    }

    #[test]
    fn test_first_occurrence_within_pattern() {
        assert_eq!(extract_comic_number("#10 or #20"), Some(10));
        assert_eq!(extract_comic_number("either 7 or 8"), Some(7));
    }

    #[test]
    fn test_oversized_number_saturates_instead_of_falling_through() {
        assert_eq!(extract_comic_number("https://xkcd.com/99999999999/"), Some(u32::MAX));
        assert_eq!(extract_comic_number("#99999999999 or comic 5"), Some(u32::MAX));
    }

    #[test]
    fn test_years_in_prose_still_match() {
        assert_eq!(extract_comic_number("in 2024 show me xkcd"), Some(2024));
    }
}
