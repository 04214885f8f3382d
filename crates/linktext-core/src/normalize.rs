use caseless::default_case_fold_str;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid non-word pattern"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Canonical comparison key for link text: case-folded, punctuation runs
/// turned into single spaces, whitespace collapsed and trimmed.
///
/// Word characters follow the Unicode-aware `\w` class, so letters outside
/// ASCII are kept rather than treated as punctuation. Folding is full
/// Unicode case folding, so `"Straße"` and `"STRASSE"` share a key.
pub fn normalize(text: &str) -> String {
    // Uppercasing first sends dotless `ı` to the same key as `I`.
    let folded = default_case_fold_str(&text.to_uppercase());
    let spaced = NON_WORD.replace_all(&folded, " ");
    let collapsed = WHITESPACE.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

pub fn is_normalized(text: &str) -> bool {
    normalize(text) == text
}

#[cfg(test)]
mod tests {
    use super::{is_normalized, normalize};

    #[test]
    fn strips_case_and_punctuation() {
        assert_eq!(normalize("Click Here!"), "click here");
        assert_eq!(normalize("  Learn   More.  "), "learn more");
        assert_eq!(
            normalize("Download the 2024-Q1 report"),
            "download the 2024 q1 report"
        );
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn markup_and_brackets_fold_away() {
        assert_eq!(normalize("[**click** here]"), "click here");
        assert_eq!(normalize("[read\n  more…]"), "read more");
        assert_eq!(normalize("snake_case_name"), "snake_case_name");
        assert_eq!(normalize("?!"), "");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(normalize("Café Menu"), "café menu");
        assert_eq!(normalize("ÜBER uns"), "über uns");
    }

    #[test]
    fn folds_case_beyond_lowercasing() {
        assert_eq!(normalize("ß"), "ss");
        assert_eq!(normalize("Straße"), normalize("STRASSE"));
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("ﬁle"), "file");
        assert_eq!(normalize("ΣΊΣΥΦΟΣ"), normalize("σίσυφος"));
        assert_eq!(normalize("ı"), normalize("I"));
    }

    #[test]
    fn detects_normalized_phrases() {
        assert!(is_normalized("click here"));
        assert!(is_normalized(""));
        assert!(!is_normalized("Click Here"));
        assert!(!is_normalized(" here"));
        assert!(!is_normalized("read-more"));
    }
}
