//! Database access for the resolution and ranking engine
//!
//! Free async functions over a shared `SqlitePool`, grouped per table.
//! The schema itself lives in `sahaya_common::db::init`.

pub mod concepts;
pub mod content;
pub mod feedback;
pub mod help_requests;
pub mod settings;
pub mod synonyms;
