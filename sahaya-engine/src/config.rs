//! Engine configuration
//!
//! Gemini API key resolution. The database `settings` row is authoritative
//! once set; the `GEMINI_API_KEY` environment variable and the
//! `gemini_api_key` key in `sahaya.toml` cover fresh installs. A missing
//! key is not an error: the AI and web-search tiers report themselves
//! unavailable and the local tiers keep working.

use sahaya_common::config::{RootFolderResolver, TomlConfig};
use sahaya_common::Result;
use sqlx::SqlitePool;

use crate::db::settings;

/// Environment variable consulted when the database has no key
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Load the TOML config file if one exists
///
/// Parse failures are logged and treated as "no file"; startup never
/// aborts over a bad config file.
pub fn load_file_config() -> Option<TomlConfig> {
    let path = RootFolderResolver::config_file_path()?;
    match TomlConfig::load(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(
                config_file = %path.display(),
                error = %e,
                "ignoring unreadable config file"
            );
            None
        }
    }
}

/// Resolve the Gemini API key: database, then environment, then TOML file
///
/// Warns (without printing key material) when sources carry different
/// values; the highest-priority source wins.
pub async fn resolve_gemini_api_key(
    pool: &SqlitePool,
    file_config: Option<&TomlConfig>,
) -> Result<Option<String>> {
    let from_db = settings::get_gemini_api_key(pool).await?;
    let from_env = std::env::var(GEMINI_API_KEY_VAR)
        .ok()
        .filter(|v| !v.is_empty());
    let from_file = file_config
        .and_then(|c| c.gemini_api_key.clone())
        .filter(|v| !v.is_empty());

    let mut present: Vec<(&'static str, String)> = Vec::new();
    if let Some(v) = from_db {
        present.push(("database", v));
    }
    if let Some(v) = from_env {
        present.push(("environment", v));
    }
    if let Some(v) = from_file {
        present.push(("config file", v));
    }

    let Some((winner, value)) = present.first().cloned() else {
        tracing::debug!("no Gemini API key configured; AI assistance disabled");
        return Ok(None);
    };

    let disagreeing: Vec<&str> = present
        .iter()
        .skip(1)
        .filter(|(_, v)| v != &value)
        .map(|(name, _)| *name)
        .collect();
    if !disagreeing.is_empty() {
        tracing::warn!(
            using = winner,
            disagreeing = ?disagreeing,
            "Gemini API key sources disagree"
        );
    }

    tracing::debug!(source = winner, "Gemini API key resolved");
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahaya_common::config::LoggingConfig;
    use sahaya_common::db::init_memory_database;
    use serial_test::serial;

    fn file_config(key: Option<&str>) -> TomlConfig {
        TomlConfig {
            root_folder: None,
            logging: LoggingConfig::default(),
            gemini_api_key: key.map(str::to_string),
        }
    }

    #[tokio::test]
    #[serial]
    async fn database_key_wins_over_everything() {
        std::env::set_var(GEMINI_API_KEY_VAR, "env-key");
        let pool = init_memory_database().await.unwrap();
        settings::set_gemini_api_key(&pool, "db-key").await.unwrap();

        let config = file_config(Some("file-key"));
        let key = resolve_gemini_api_key(&pool, Some(&config))
            .await
            .unwrap();
        assert_eq!(key, Some("db-key".to_string()));

        std::env::remove_var(GEMINI_API_KEY_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn environment_beats_the_file() {
        std::env::set_var(GEMINI_API_KEY_VAR, "env-key");
        let pool = init_memory_database().await.unwrap();

        let config = file_config(Some("file-key"));
        let key = resolve_gemini_api_key(&pool, Some(&config))
            .await
            .unwrap();
        assert_eq!(key, Some("env-key".to_string()));

        std::env::remove_var(GEMINI_API_KEY_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn file_key_used_when_alone() {
        std::env::remove_var(GEMINI_API_KEY_VAR);
        let pool = init_memory_database().await.unwrap();

        let config = file_config(Some("file-key"));
        let key = resolve_gemini_api_key(&pool, Some(&config))
            .await
            .unwrap();
        assert_eq!(key, Some("file-key".to_string()));
    }

    #[tokio::test]
    #[serial]
    async fn no_source_yields_none() {
        std::env::remove_var(GEMINI_API_KEY_VAR);
        let pool = init_memory_database().await.unwrap();

        let key = resolve_gemini_api_key(&pool, None).await.unwrap();
        assert_eq!(key, None);
    }

    #[tokio::test]
    #[serial]
    async fn empty_environment_value_is_ignored() {
        std::env::set_var(GEMINI_API_KEY_VAR, "");
        let pool = init_memory_database().await.unwrap();

        let config = file_config(Some("file-key"));
        let key = resolve_gemini_api_key(&pool, Some(&config))
            .await
            .unwrap();
        assert_eq!(key, Some("file-key".to_string()));

        std::env::remove_var(GEMINI_API_KEY_VAR);
    }
}
