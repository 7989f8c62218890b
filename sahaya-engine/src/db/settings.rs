//! Settings table operations
//!
//! Key/value accessors over the `settings` table. The database is the
//! authoritative source for instance settings; environment variables and
//! the TOML file are fallbacks (see `crate::config`).

use sahaya_common::{Error, Result};
use sqlx::SqlitePool;

/// Get the Gemini API key from the database
///
/// Returns `None` when the key was never stored.
pub async fn get_gemini_api_key(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting::<String>(pool, "gemini_api_key").await
}

/// Store the Gemini API key in the database
pub async fn set_gemini_api_key(pool: &SqlitePool, key: &str) -> Result<()> {
    set_setting(pool, "gemini_api_key", key).await
}

/// Overall cascade deadline in seconds (default 45)
pub async fn get_resolve_deadline_secs(pool: &SqlitePool) -> Result<u64> {
    get_setting(pool, "resolve_deadline_secs")
        .await
        .map(|opt| opt.unwrap_or(45))
}

/// Generic setting getter (internal)
async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("bad setting '{}': {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(pool: &SqlitePool, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await?;

    Ok(())
}
