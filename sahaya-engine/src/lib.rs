//! # Sahaya Engine
//!
//! Turns free-form teacher queries in English, Hindi or Kannada into
//! canonical concept identifiers, and concept identifiers into ranked
//! supporting material:
//!
//! - `resolver`: script detection, normalization and the tiered matching
//!   cascade (exact, partial, keyword, full scan, fuzzy, AI-assisted)
//! - `ranking`: the content priority ladder with a web-search fallback
//! - `services`: the `AiAdapter`/`WebSearchAdapter` seams and the Gemini
//!   implementation of both
//! - `db`: query functions over the shared SQLite pool
//! - `seed`: the built-in starter catalog
//!
//! The `sahaya` binary wires these together behind a small CLI.

pub mod config;
pub mod db;
pub mod ranking;
pub mod resolver;
pub mod seed;
pub mod services;

pub use ranking::{ContentPipeline, RankedItem};
pub use resolver::{ConceptResolver, Resolution};
pub use services::{AiAdapter, GeminiClient, TranslationCache, WebSearchAdapter};
