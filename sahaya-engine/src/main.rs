//! sahaya - multilingual teaching-topic resolution and content ranking
//!
//! Subcommands:
//! - `seed` loads the built-in concept/content catalog
//! - `resolve <text>` runs the matching cascade and records the attempt
//! - `suggest <concept-id>` runs the content priority ladder
//! - `translate <text> --to <lang>` translates through the AI adapter
//! - `gaps` lists unresolved help requests for gap analysis
//!
//! Everything shares one SQLite database inside the root folder; see
//! `sahaya_common::config` for how that folder is resolved.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sahaya_common::config::{RootFolderInitializer, RootFolderResolver};
use sahaya_common::db::init_database;
use sahaya_common::Language;
use sqlx::SqlitePool;
use tracing::info;

use sahaya_engine::db::{concepts, help_requests, settings};
use sahaya_engine::ranking::ContentPipeline;
use sahaya_engine::resolver::ConceptResolver;
use sahaya_engine::services::{GeminiClient, TranslationCache};
use sahaya_engine::{config, seed};

/// Multilingual teaching-topic resolution and content ranking
#[derive(Parser, Debug)]
#[clap(name = "sahaya", version)]
#[clap(about = "Resolve teacher queries to concepts and rank supporting content")]
struct Cli {
    /// Root folder holding the database (overrides env and config file)
    #[clap(long, global = true, value_name = "DIR")]
    root_folder: Option<PathBuf>,

    /// Database file to use directly, bypassing root folder resolution
    #[clap(long, global = true, value_name = "FILE")]
    database: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the built-in concept and content catalog (idempotent)
    Seed,
    /// Resolve free-form query text to a concept id
    Resolve {
        /// Query text in English, Hindi or Kannada
        text: String,
        /// Language hint from speech recognition (en/hi/kn)
        #[clap(long, value_name = "LANG")]
        speech_lang: Option<Language>,
    },
    /// Rank stored content for a concept, falling back to web search
    Suggest {
        /// Concept id, e.g. MATH_FRACTIONS
        concept_id: String,
        /// Preferred content language (en/hi/kn)
        #[clap(long, default_value = "en")]
        language: Language,
        /// Maximum number of items
        #[clap(long, default_value = "10")]
        limit: u32,
        /// Free-text description of the teacher's situation
        #[clap(long)]
        elaboration: Option<String>,
        /// Re-sort the chosen tier by feedback score
        #[clap(long)]
        scored: bool,
    },
    /// Translate text through the AI adapter
    Translate {
        /// Text to translate
        text: String,
        /// Target language (en/hi/kn)
        #[clap(long, value_name = "LANG")]
        to: Language,
    },
    /// List unresolved help requests, newest first
    Gaps {
        /// Maximum number of rows
        #[clap(long, default_value = "20")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Step 1: locate the database, creating the root folder if missing
    let db_path = match &cli.database {
        Some(path) => path.clone(),
        None => {
            let resolver = RootFolderResolver::new(cli.root_folder.clone());
            let initializer = RootFolderInitializer::new(resolver.resolve());
            initializer.ensure_directory_exists()?;
            initializer.database_path()
        }
    };
    info!("Database: {}", db_path.display());

    // Step 2: open or create the database
    let pool = init_database(&db_path).await?;

    // Step 3: run the requested command
    match cli.command {
        Command::Seed => run_seed(&pool).await,
        Command::Resolve { text, speech_lang } => run_resolve(&pool, &text, speech_lang).await,
        Command::Suggest {
            concept_id,
            language,
            limit,
            elaboration,
            scored,
        } => run_suggest(&pool, &concept_id, language, limit, elaboration, scored).await,
        Command::Translate { text, to } => run_translate(&pool, &text, to).await,
        Command::Gaps { limit } => run_gaps(&pool, limit).await,
    }
}

/// Build the Gemini client when an API key is configured
///
/// A missing key is normal: the caller degrades to the local tiers.
async fn gemini_client(pool: &SqlitePool) -> Result<Option<Arc<GeminiClient>>> {
    let file_config = config::load_file_config();
    let Some(key) = config::resolve_gemini_api_key(pool, file_config.as_ref()).await? else {
        return Ok(None);
    };
    Ok(Some(Arc::new(GeminiClient::new(key)?)))
}

async fn run_seed(pool: &SqlitePool) -> Result<()> {
    let summary = seed::apply(pool).await?;
    println!(
        "seeded {} concepts, {} synonyms, {} content items",
        summary.concepts, summary.synonyms, summary.content_items
    );
    Ok(())
}

async fn run_resolve(
    pool: &SqlitePool,
    text: &str,
    speech_lang: Option<Language>,
) -> Result<()> {
    let deadline = Duration::from_secs(settings::get_resolve_deadline_secs(pool).await?);
    let mut resolver = ConceptResolver::new(pool.clone()).with_deadline(deadline);
    if let Some(client) = gemini_client(pool).await? {
        resolver = resolver.with_ai(client);
    }

    let resolution = resolver.resolve(text, speech_lang).await?;

    // Every attempt is recorded; unresolved ones feed the gaps report
    help_requests::record_help_request(
        pool,
        text,
        resolution.language,
        &resolution.normalized_text,
        resolution.concept_id.as_deref(),
    )
    .await?;

    match &resolution.concept_id {
        Some(id) => println!(
            "{} (language: {}, normalized: {})",
            id, resolution.language, resolution.normalized_text
        ),
        None => println!(
            "no match (language: {}, normalized: {})",
            resolution.language, resolution.normalized_text
        ),
    }
    Ok(())
}

async fn run_suggest(
    pool: &SqlitePool,
    concept_id: &str,
    language: Language,
    limit: u32,
    elaboration: Option<String>,
    scored: bool,
) -> Result<()> {
    let Some(concept) = concepts::get_concept(pool, concept_id).await? else {
        anyhow::bail!("unknown concept: {}", concept_id);
    };
    if let Some(description) = concept.description_for(language) {
        println!("{}: {}", concept.concept_id, description);
    }

    let mut pipeline = ContentPipeline::new(pool.clone());
    if let Some(client) = gemini_client(pool).await? {
        pipeline = pipeline.with_ai(client.clone()).with_web_search(client);
    }

    if scored {
        let (items, label) = pipeline
            .rank_scored(concept_id, language, limit, elaboration.as_deref())
            .await?;
        println!("source: {}", label.as_str());
        for ranked in &items {
            println!(
                "[{:.1}/5, {:.0}% worked] {} <{}>",
                ranked.stats.avg_rating,
                ranked.stats.success_ratio * 100.0,
                ranked.content.title,
                ranked.content.content_url
            );
        }
        if items.is_empty() {
            println!("(no content)");
        }
    } else {
        let (items, label) = pipeline
            .rank(concept_id, language, limit, elaboration.as_deref())
            .await?;
        println!("source: {}", label.as_str());
        for item in &items {
            println!(
                "[{}] {} <{}>",
                item.content_type, item.title, item.content_url
            );
        }
        if items.is_empty() {
            println!("(no content)");
        }
    }
    Ok(())
}

async fn run_translate(pool: &SqlitePool, text: &str, to: Language) -> Result<()> {
    let Some(client) = gemini_client(pool).await? else {
        anyhow::bail!("no Gemini API key configured; translation needs one");
    };

    let cache = TranslationCache::new();
    let translated = cache.translate(client.as_ref(), text, to).await?;
    println!("{}", translated);
    Ok(())
}

async fn run_gaps(pool: &SqlitePool, limit: u32) -> Result<()> {
    let rows = help_requests::unresolved_help_requests(pool, limit).await?;
    if rows.is_empty() {
        println!("no unresolved queries");
        return Ok(());
    }

    for row in &rows {
        println!(
            "{:>4}x [{}] {} (last seen {})",
            row.occurrences,
            row.detected_language,
            row.normalized_text,
            row.last_seen.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
