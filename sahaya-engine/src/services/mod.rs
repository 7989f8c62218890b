//! External service integrations
//!
//! The adapter traits are the seam between the resolver/ranking logic and
//! the outside world; `GeminiClient` is the production implementation of
//! both, and `TranslationCache` fronts the translate call.

pub mod adapter;
pub mod gemini;
pub mod translation;

pub use adapter::{
    AdapterError, AiAdapter, NewTopicProposal, SearchHit, TopicMatch, TopicRef,
    TranslationResult, WebSearchAdapter,
};
pub use gemini::GeminiClient;
pub use translation::TranslationCache;
