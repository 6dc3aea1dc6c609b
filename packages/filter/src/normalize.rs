//! Query text normalization.
//!
//! Applied to every query before lexicon matching so that "Friday's",
//! "FRIDAYS" and "fridays" produce the same token, and so that lexicon
//! phrases can be compared as space-joined token windows.

use regex::Regex;
use std::sync::LazyLock;

/// Apostrophes are dropped rather than split on ("friday's" -> "fridays").
static APOSTROPHE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"['\u{2019}]").expect("valid regex"));

/// En and em dashes are folded into an ASCII hyphen so year ranges survive.
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{2013}\u{2014}]").expect("valid regex"));

/// Everything except letters, digits, whitespace, `-` and `:` separates
/// tokens.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s:\-]+").expect("valid regex"));

/// Normalizes free text for matching.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Drop apostrophes
/// 3. Fold en/em dashes to `-`
/// 4. Replace remaining punctuation with spaces
/// 5. Collapse whitespace and trim
#[must_use]
pub fn normalize(input: &str) -> String {
    let lower = input.to_lowercase();
    let no_apostrophes = APOSTROPHE_RE.replace_all(&lower, "");
    let dashes = DASH_RE.replace_all(&no_apostrophes, "-");
    let no_punct = PUNCTUATION_RE.replace_all(&dashes, " ");
    no_punct.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes `input` and splits it into tokens.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    normalize(input)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses() {
        assert_eq!(normalize("  Brooklyn   2022\tCRASHES "), "brooklyn 2022 crashes");
    }

    #[test]
    fn drops_apostrophes() {
        assert_eq!(normalize("Friday's crashes"), "fridays crashes");
        assert_eq!(normalize("Friday\u{2019}s crashes"), "fridays crashes");
    }

    #[test]
    fn keeps_hyphens_and_colons() {
        assert_eq!(normalize("e-bike at 17:30"), "e-bike at 17:30");
        assert_eq!(normalize("2019\u{2013}2021"), "2019-2021");
    }

    #[test]
    fn splits_on_punctuation() {
        assert_eq!(
            tokenize("Queens, Friday night; motorcycle fatalities!"),
            vec!["queens", "friday", "night", "motorcycle", "fatalities"]
        );
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ?! ").is_empty());
    }
}
