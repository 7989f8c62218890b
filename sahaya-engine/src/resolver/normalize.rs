//! Text normalization
//!
//! Canonicalizes query text before matching: lowercasing for English, a
//! single suffix strip for Hindi/Kannada, and whitespace collapsing for
//! everything. The suffix lists and the English stop-word set are fixed
//! tables bundled in [`LanguageRules`], built once at startup and passed
//! by reference wherever they are needed.

use sahaya_common::Language;
use std::collections::HashSet;

/// Kannada suffixes, checked in order; first match is stripped
const KANNADA_SUFFIXES: &[&str] = &[
    "ಗಳು",    // plural
    "ಕ್ರಿಯೆ", // action/process
    "ವನ್ನು",  // accusative
    "ದಲ್ಲಿ",  // locative
    "ಯಲ್ಲಿ",  // locative variant
    "ಯಿಂದ",   // instrumental
    "ಗೆ",     // dative
    "ಯ",      // genitive
];

/// Hindi suffixes, checked in order; first match is stripped.
/// Longer suffixes come before any shorter suffix of themselves
/// ("ियों" before "ों", "में" before "ें") so the first-match rule
/// cannot pick a truncated strip.
const HINDI_SUFFIXES: &[&str] = &[
    "ियों", // feminine plural oblique
    "ियाँ", // feminine plural
    "में",  // locative
    "ों",   // plural oblique
    "ें",   // plural
    "ना",   // infinitive
    "ने",   // oblique infinitive
    "से",   // instrumental
    "को",   // dative
    "का",   // genitive masculine
    "की",   // genitive feminine
    "के",   // genitive plural
];

/// English stop words dropped by the keyword tier
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "we", "our", "you", "your", "he", "she", "it", "they", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own",
    "same", "so", "than", "too", "very", "can", "will", "just", "should", "now", "want", "need",
    "help", "understand", "learn", "teach", "explain", "know", "tell", "show", "please", "could",
    "would",
];

/// Immutable per-language matching rules, loaded once at startup
#[derive(Debug, Clone)]
pub struct LanguageRules {
    hindi_suffixes: &'static [&'static str],
    kannada_suffixes: &'static [&'static str],
    stop_words: HashSet<&'static str>,
}

impl Default for LanguageRules {
    fn default() -> Self {
        LanguageRules {
            hindi_suffixes: HINDI_SUFFIXES,
            kannada_suffixes: KANNADA_SUFFIXES,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }
}

impl LanguageRules {
    /// Suffix strip list for a language, empty for English
    pub fn suffixes_for(&self, language: Language) -> &[&'static str] {
        match language {
            Language::En => &[],
            Language::Hi => self.hindi_suffixes,
            Language::Kn => self.kannada_suffixes,
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// Normalize query text for matching
///
/// English is lowercased; Hindi/Kannada get at most one suffix stripped
/// (the first matching entry in list order). All languages end with
/// whitespace runs collapsed to single spaces and edges trimmed.
pub fn normalize(text: &str, language: Language, rules: &LanguageRules) -> String {
    let trimmed = text.trim();

    let stripped = match language {
        Language::En => trimmed.to_lowercase(),
        Language::Hi | Language::Kn => {
            let mut remainder = trimmed;
            for suffix in rules.suffixes_for(language) {
                if let Some(rest) = remainder.strip_suffix(suffix) {
                    remainder = rest;
                    break;
                }
            }
            remainder.to_string()
        }
    };

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
