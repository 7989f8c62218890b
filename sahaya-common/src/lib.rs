//! # Sahaya Common Library
//!
//! Shared code for the Sahaya crates:
//! - Error type and result alias
//! - Supported languages
//! - Domain models (concepts, synonyms, content, feedback, help requests)
//! - Configuration loading and root folder resolution
//! - Database bootstrap (schema + pragmas)

pub mod config;
pub mod db;
pub mod error;
pub mod language;
pub mod models;

pub use error::{Error, Result};
pub use language::Language;
