//! Keyword extraction for the English keyword-matching tier

use crate::resolver::normalize::LanguageRules;

/// Extract meaningful keywords from English text
///
/// Drops stop words and tokens of one or two characters, then sorts by
/// descending character length (stable, so equal-length tokens keep their
/// input order). Longer words are usually more specific, so the matching
/// tier tries them first.
pub fn extract_keywords(text: &str, rules: &LanguageRules) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = lowered
        .split_whitespace()
        .filter(|word| !rules.is_stop_word(word) && word.chars().count() > 2)
        .map(str::to_string)
        .collect();

    keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    keywords
}
