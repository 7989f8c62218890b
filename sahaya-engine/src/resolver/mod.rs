//! Multilingual concept resolution
//!
//! `script` detects the query language, `normalize` reduces the text to a
//! matchable form, `keywords` pulls out the useful English words, and
//! `cascade` ties them to the synonym store and the AI adapter.

pub mod cascade;
pub mod keywords;
pub mod normalize;
pub mod script;

pub use cascade::{ConceptResolver, Resolution, DEFAULT_DEADLINE};
pub use keywords::extract_keywords;
pub use normalize::{normalize, LanguageRules};
pub use script::{apply_speech_hint, detect_script};
