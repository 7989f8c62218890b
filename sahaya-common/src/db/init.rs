//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the schema. All DDL
//! is idempotent, so calling this on every startup is safe. Referential
//! integrity between synonyms/content and concepts is enforced here so the
//! matching cascade can trust that a stored synonym always resolves to an
//! existing concept.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_pragmas(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Open an in-memory database with the full schema, for tests
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure_pragmas(&pool).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    // Wait instead of failing when another connection holds the write lock
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Apply the schema (idempotent, safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_concepts_table(pool).await?;
    create_concept_synonyms_table(pool).await?;
    create_content_items_table(pool).await?;
    create_content_feedback_table(pool).await?;
    create_help_requests_table(pool).await?;
    Ok(())
}

/// Key/value store for instance settings (API keys, tunables)
async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_concepts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS concepts (
            concept_id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            description_en TEXT,
            description_hi TEXT,
            description_kn TEXT,
            grade TEXT NOT NULL DEFAULT 'all',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(concept_id) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_concepts_subject ON concepts(subject)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Synonym rows are unique per (concept, language, term) so re-inserting
/// an existing synonym is a no-op rather than a duplicate.
async fn create_concept_synonyms_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS concept_synonyms (
            id TEXT PRIMARY KEY,
            concept_id TEXT NOT NULL REFERENCES concepts(concept_id),
            language TEXT NOT NULL CHECK (language IN ('en', 'hi', 'kn')),
            term TEXT NOT NULL CHECK (length(term) > 0),
            UNIQUE (concept_id, language, term)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_synonyms_language ON concept_synonyms(language)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_synonyms_term ON concept_synonyms(term)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Content URLs are unique so web-search persistence dedupes at the
/// storage layer; concurrent identical inserts converge to one row.
async fn create_content_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_items (
            id TEXT PRIMARY KEY,
            concept_id TEXT NOT NULL REFERENCES concepts(concept_id),
            uploaded_by TEXT,
            subject TEXT,
            grade TEXT,
            language TEXT NOT NULL CHECK (language IN ('en', 'hi', 'kn')),
            content_type TEXT NOT NULL,
            title TEXT NOT NULL,
            content_url TEXT NOT NULL UNIQUE,
            description TEXT,
            summary TEXT,
            source_type TEXT NOT NULL DEFAULT 'internal'
                CHECK (source_type IN ('internal', 'external')),
            is_verified INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_content_concept ON content_items(concept_id, language)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_content_created ON content_items(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_content_feedback_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_feedback (
            id TEXT PRIMARY KEY,
            content_id TEXT NOT NULL REFERENCES content_items(id),
            teacher_id TEXT,
            worked INTEGER NOT NULL,
            rating INTEGER CHECK (rating IS NULL OR (rating >= 1 AND rating <= 5)),
            comment TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_feedback_content ON content_feedback(content_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Every resolution attempt is recorded here; rows with a NULL concept_id
/// are the unresolved queries surfaced by gap analysis.
async fn create_help_requests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS help_requests (
            id TEXT PRIMARY KEY,
            query_text TEXT NOT NULL,
            detected_language TEXT NOT NULL CHECK (detected_language IN ('en', 'hi', 'kn')),
            normalized_text TEXT NOT NULL,
            concept_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_help_requests_concept ON help_requests(concept_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
