//! Script detection
//!
//! Classifies raw text as English, Hindi or Kannada by counting codepoints
//! in the Kannada and Devanagari Unicode blocks. This is a density
//! heuristic, not a language model: romanized Hindi/Kannada comes back as
//! `en` unless the speech engine supplies a hint.

use sahaya_common::Language;

/// Kannada block: U+0C80..U+0CFF
fn is_kannada(ch: char) -> bool {
    matches!(ch as u32, 0x0C80..=0x0CFF)
}

/// Devanagari block: U+0900..U+097F
fn is_devanagari(ch: char) -> bool {
    matches!(ch as u32, 0x0900..=0x097F)
}

/// Detect the dominant script of `text`
///
/// Kannada wins when it has strictly more codepoints than Devanagari;
/// any Devanagari at all beats the English default.
pub fn detect_script(text: &str) -> Language {
    let mut kannada = 0usize;
    let mut devanagari = 0usize;

    for ch in text.chars() {
        if is_kannada(ch) {
            kannada += 1;
        } else if is_devanagari(ch) {
            devanagari += 1;
        }
    }

    if kannada > devanagari && kannada > 0 {
        Language::Kn
    } else if devanagari > 0 {
        Language::Hi
    } else {
        Language::En
    }
}

/// Apply the speech-recognition language hint
///
/// When script detection says `en` but the speech engine heard Kannada or
/// Hindi, the input is likely transliterated Indic text in Latin letters,
/// so the hint wins. The override never applies in the other direction.
pub fn apply_speech_hint(detected: Language, hint: Option<Language>) -> Language {
    match (detected, hint) {
        (Language::En, Some(spoken @ (Language::Kn | Language::Hi))) => {
            tracing::debug!(
                hint = %spoken,
                "overriding detected script 'en' with speech language (transliteration)"
            );
            spoken
        }
        _ => detected,
    }
}
