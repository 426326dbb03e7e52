//! Negation-aware keyword search.
//!
//! A keyword counts as present when it occurs in the lower-cased text and
//! is not directly preceded by one of a fixed set of English negation cues
//! ("no fever", "denies fever", "no evidence of fever", ...). Negation is
//! only recognised immediately before the keyword: "no clear evidence of
//! fever" still reads as positive.

use regex::Regex;

/// Negation cues, as regex fragments, that may directly precede a keyword.
const NEGATION_CUES: &[&str] = &[
    r"no",
    r"not",
    r"without",
    r"denies",
    r"absence\s+of",
    r"no\s+evidence\s+of",
    r"no\s+signs\s+of",
    r"free\s+of",
];

fn negation_regex(keyword: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?:{})\s+{}",
        NEGATION_CUES.join("|"),
        regex::escape(keyword)
    );
    Regex::new(&pattern).ok()
}

/// True when `keyword` occurs in `text` and no occurrence of it in `text`
/// is negated.
///
/// A single negated mention is enough to reject the whole text, even when
/// another mention elsewhere is positive.
pub fn keyword_present(text: &str, keyword: &str) -> bool {
    let text = text.to_lowercase();
    let keyword = keyword.to_lowercase();

    if !text.contains(&keyword) {
        return false;
    }

    match negation_regex(&keyword) {
        Some(negation) => !negation.is_match(&text),
        None => true,
    }
}

/// True when at least one element of `texts` passes [`keyword_present`].
///
/// Negation is local to each element: a negated mention in one string does
/// not cancel a positive mention in another.
pub fn keyword_present_in_any<S: AsRef<str>>(texts: &[S], keyword: &str) -> bool {
    texts.iter().any(|t| keyword_present(t.as_ref(), keyword))
}
