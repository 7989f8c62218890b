//! Supported languages
//!
//! Sahaya works with three languages: English, Hindi and Kannada.
//! Synonyms, content items and help requests are all tagged with one of
//! these codes, and the resolution cascade branches on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Language of a piece of text or stored row
///
/// Serialized as the two-letter codes `en` / `hi` / `kn`, which is also
/// how the database stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (Latin script)
    En,
    /// Hindi (Devanagari script)
    Hi,
    /// Kannada (Kannada script)
    Kn,
}

impl Language {
    /// Two-letter code used in the database and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
        }
    }

    /// All supported languages, in display order
    pub fn all() -> [Language; 3] {
        [Language::En, Language::Hi, Language::Kn]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "kn" => Ok(Language::Kn),
            other => Err(Error::InvalidInput(format!(
                "unsupported language code: {}",
                other
            ))),
        }
    }
}
