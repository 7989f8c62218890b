//! Translation cache
//!
//! The translation fallback of the resolver and the `translate` CLI
//! command share this bounded, TTL-evicting cache so repeated
//! translations of the same query do not burn adapter quota.

use std::time::Duration;

use moka::future::Cache;
use sahaya_common::Language;

use super::adapter::{AdapterError, AiAdapter};

const CACHE_CAPACITY: u64 = 1024;
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Async cache over `AiAdapter::translate`, keyed by (text, target)
pub struct TranslationCache {
    cache: Cache<(String, Language), String>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Translate through the adapter, serving repeats from the cache.
    /// Failures are returned to the caller and never cached.
    pub async fn translate(
        &self,
        adapter: &dyn AiAdapter,
        text: &str,
        target: Language,
    ) -> Result<String, AdapterError> {
        let key = (text.to_string(), target);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(text, target = %target, "translation cache hit");
            return Ok(hit);
        }

        let result = adapter.translate(text, target).await?;
        self.cache.insert(key, result.text.clone()).await;
        Ok(result.text)
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}
