//! Content ranking pipeline integration tests
//!
//! Exercises the preference ladder over a real (in-memory) store, plus
//! the web-search tier with fake adapters.

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use helpers::*;
use sahaya_common::models::{ContentItem, SourceLabel, SourceType};
use sahaya_common::Language;
use sahaya_engine::db::{content, feedback};
use sahaya_engine::ranking::ContentPipeline;
use uuid::Uuid;

#[tokio::test]
async fn verified_internal_wins_the_ladder() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_FRACTIONS", "math", "Parts of a whole").await;
    let top = "https://example.com/verified-upload";
    add_content(&pool, "MATH_FRACTIONS", top, Language::En, true, SourceType::Internal, 0).await;
    add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/verified-external",
        Language::En,
        true,
        SourceType::External,
        0,
    )
    .await;
    add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/unverified-upload",
        Language::En,
        false,
        SourceType::Internal,
        0,
    )
    .await;
    add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/unverified-external",
        Language::En,
        false,
        SourceType::External,
        0,
    )
    .await;

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("MATH_FRACTIONS", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::Internal);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content_url, top);
}

#[tokio::test]
async fn verified_external_content_keeps_the_internal_label() {
    let pool = empty_pool().await;
    add_concept(&pool, "SCI_ENV_WATER_CYCLE", "science", "Water cycle").await;
    add_content(
        &pool,
        "SCI_ENV_WATER_CYCLE",
        "https://example.com/curated",
        Language::En,
        true,
        SourceType::External,
        0,
    )
    .await;

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("SCI_ENV_WATER_CYCLE", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::Internal);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn unverified_upload_is_labeled_as_such() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_DIVISION", "math", "Dividing numbers").await;
    add_content(
        &pool,
        "MATH_DIVISION",
        "https://example.com/new-upload",
        Language::En,
        false,
        SourceType::Internal,
        0,
    )
    .await;

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("MATH_DIVISION", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::InternalUnverified);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn unverified_external_content_is_the_fallback() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_DIVISION", "math", "Dividing numbers").await;
    add_content(
        &pool,
        "MATH_DIVISION",
        "https://example.com/old-discovery",
        Language::En,
        false,
        SourceType::External,
        0,
    )
    .await;

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("MATH_DIVISION", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::ExternalFallback);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn tiers_never_merge() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_FRACTIONS", "math", "Parts of a whole").await;
    add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/the-good-one",
        Language::En,
        true,
        SourceType::Internal,
        0,
    )
    .await;
    for n in 0..3 {
        add_content(
            &pool,
            "MATH_FRACTIONS",
            &format!("https://example.com/pending-{}", n),
            Language::En,
            false,
            SourceType::Internal,
            0,
        )
        .await;
    }

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("MATH_FRACTIONS", Language::En, 10, None)
        .await
        .unwrap();

    // Room for four, but the lower tier must not leak in
    assert_eq!(label, SourceLabel::Internal);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content_url, "https://example.com/the-good-one");
}

#[tokio::test]
async fn empty_store_returns_the_internal_label() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_ADDITION", "math", "Adding numbers").await;

    let pipeline = ContentPipeline::new(pool);
    let (items, label) = pipeline
        .rank("MATH_ADDITION", Language::En, 10, None)
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(label, SourceLabel::Internal);
}

#[tokio::test]
async fn web_search_synthesizes_persists_and_labels() {
    let pool = empty_pool().await;
    add_concept(&pool, "SCI_BIO_PHOTOSYNTHESIS", "science", "How plants make food").await;

    let web = Arc::new(FakeWebSearch {
        hits: vec![
            hit("Leaf experiment", "https://youtube.com/watch?v=abc123", "a short clip"),
            hit("Printable worksheet", "https://example.com/worksheet.pdf", "printable"),
        ],
        ..Default::default()
    });
    let ai = Arc::new(ScriptedAi {
        summary: Some("short classroom summary".to_string()),
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool)
        .with_ai(ai)
        .with_web_search(web.clone());

    let (items, label) = pipeline
        .rank("SCI_BIO_PHOTOSYNTHESIS", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::WebSearch);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content_type, "video");
    assert_eq!(items[1].content_type, "document");
    for item in &items {
        assert_eq!(item.source_type, SourceType::External);
        assert!(!item.is_verified);
        assert_eq!(item.language, Language::En);
        assert_eq!(item.subject.as_deref(), Some("science"));
        assert_eq!(item.summary.as_deref(), Some("short classroom summary"));
    }
    // The search query is the concept's display name, not the raw user text
    assert_eq!(
        web.last_query.lock().unwrap().as_deref(),
        Some("How plants make food")
    );

    // Discoveries were persisted: the next call is served from the store
    let (again, label) = pipeline
        .rank("SCI_BIO_PHOTOSYNTHESIS", Language::En, 10, None)
        .await
        .unwrap();
    assert_eq!(label, SourceLabel::ExternalFallback);
    assert_eq!(again.len(), 2);
    assert_eq!(web.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn web_tier_requests_five_and_truncates_to_limit() {
    let pool = empty_pool().await;
    add_concept(&pool, "SCI_PHY_MOTION", "science", "Motion and forces").await;

    let hits: Vec<_> = (1..=5)
        .map(|n| {
            hit(
                &format!("Result {}", n),
                &format!("https://example.com/result-{}", n),
                "snippet",
            )
        })
        .collect();
    let web = Arc::new(FakeWebSearch {
        hits,
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool).with_web_search(web.clone());

    let (items, label) = pipeline
        .rank("SCI_PHY_MOTION", Language::En, 2, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::WebSearch);
    assert_eq!(items.len(), 2);
    // The request always asks for the full batch; the limit only trims
    // what the caller sees
    assert_eq!(web.last_max_results.load(Ordering::SeqCst), 5);

    // All five were persisted regardless of the display limit
    let (stored, label) = pipeline
        .rank("SCI_PHY_MOTION", Language::En, 10, None)
        .await
        .unwrap();
    assert_eq!(label, SourceLabel::ExternalFallback);
    assert_eq!(stored.len(), 5);
}

#[tokio::test]
async fn known_urls_are_reused_not_duplicated() {
    let pool = empty_pool().await;
    add_concept(&pool, "CLASSROOM_ATTENTION", "pedagogy", "Student attention").await;
    add_concept(&pool, "CLASSROOM_DISCIPLINE", "pedagogy", "Classroom discipline").await;
    let existing = add_content(
        &pool,
        "CLASSROOM_DISCIPLINE",
        "https://example.com/shared-article",
        Language::En,
        false,
        SourceType::External,
        0,
    )
    .await;

    let web = Arc::new(FakeWebSearch {
        hits: vec![
            hit("Shared", "https://example.com/shared-article", "seen before"),
            hit("Fresh", "https://example.com/fresh-article", "new"),
        ],
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool.clone()).with_web_search(web);

    let (items, label) = pipeline
        .rank("CLASSROOM_ATTENTION", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::WebSearch);
    assert_eq!(items.len(), 2);
    // The known URL keeps its row, and its original concept
    assert_eq!(items[0].id, existing.id);
    assert_eq!(items[0].concept_id, "CLASSROOM_DISCIPLINE");
    assert_eq!(items[1].concept_id, "CLASSROOM_ATTENTION");

    let row = content::find_by_url(&pool, "https://example.com/shared-article")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.id, existing.id);
}

#[tokio::test]
async fn elaboration_retailors_summaries_in_memory_only() {
    let pool = empty_pool().await;
    add_concept(&pool, "SCI_ENV_WATER_CYCLE", "science", "Water cycle").await;
    add_concept(&pool, "SCI_ENV_PLANTS", "science", "Plant life").await;
    let original = ContentItem {
        id: Uuid::new_v4().to_string(),
        concept_id: "SCI_ENV_PLANTS".to_string(),
        uploaded_by: None,
        subject: Some("science".to_string()),
        grade: None,
        language: Language::En,
        content_type: "article".to_string(),
        title: "Evaporation demo".to_string(),
        content_url: "https://example.com/evaporation-demo".to_string(),
        description: Some("A hands-on demonstration".to_string()),
        summary: Some("stored summary".to_string()),
        source_type: SourceType::External,
        is_verified: false,
        created_at: Utc::now(),
    };
    let original = content::insert_or_fetch_by_url(&pool, &original).await.unwrap();

    let ai = Arc::new(ScriptedAi {
        summary: Some("tailored for a class of forty".to_string()),
        ..Default::default()
    });
    let web = Arc::new(FakeWebSearch {
        hits: vec![hit(
            "Evaporation demo",
            "https://example.com/evaporation-demo",
            "demo",
        )],
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool.clone())
        .with_ai(ai.clone())
        .with_web_search(web);

    let (items, _) = pipeline
        .rank(
            "SCI_ENV_WATER_CYCLE",
            Language::En,
            10,
            Some("40 students, no projector"),
        )
        .await
        .unwrap();

    assert_eq!(
        items[0].summary.as_deref(),
        Some("tailored for a class of forty")
    );
    assert!(ai.summarize_calls.load(Ordering::SeqCst) >= 1);

    // The stored row is untouched
    let row = content::find_by_url(&pool, "https://example.com/evaporation-demo")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.id, original.id);
    assert_eq!(row.summary.as_deref(), Some("stored summary"));
}

#[tokio::test]
async fn scored_ranking_reorders_by_feedback_within_the_tier() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_FRACTIONS", "math", "Parts of a whole").await;
    let older = add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/loved-by-teachers",
        Language::En,
        true,
        SourceType::Internal,
        60,
    )
    .await;
    let newer = add_content(
        &pool,
        "MATH_FRACTIONS",
        "https://example.com/just-uploaded",
        Language::En,
        true,
        SourceType::Internal,
        0,
    )
    .await;

    let pipeline = ContentPipeline::new(pool.clone());

    // Before any feedback: plain recency order
    let (plain, _) = pipeline
        .rank("MATH_FRACTIONS", Language::En, 10, None)
        .await
        .unwrap();
    assert_eq!(plain[0].id, newer.id);

    feedback::record_feedback(&pool, &older.id, Some("teacher-1"), true, Some(5), None)
        .await
        .unwrap();
    feedback::record_feedback(&pool, &older.id, Some("teacher-2"), true, Some(5), None)
        .await
        .unwrap();

    let (scored, label) = pipeline
        .rank_scored("MATH_FRACTIONS", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::Internal);
    assert_eq!(scored[0].content.id, older.id);
    assert_eq!(scored[1].content.id, newer.id);
    assert_eq!(scored[0].stats.feedback_count, 2);
    assert!(scored[0].stats.score() > scored[1].stats.score());
}

#[tokio::test]
async fn scored_web_results_keep_search_order_with_zero_stats() {
    let pool = empty_pool().await;
    add_concept(&pool, "CLASSROOM_NOISE", "pedagogy", "Managing classroom noise").await;

    let web = Arc::new(FakeWebSearch {
        hits: vec![
            hit("First", "https://example.com/first", "a"),
            hit("Second", "https://example.com/second", "b"),
            hit("Third", "https://example.com/third", "c"),
        ],
        ..Default::default()
    });
    let ai = Arc::new(ScriptedAi {
        summary: Some("summary".to_string()),
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool).with_ai(ai).with_web_search(web);

    let (scored, label) = pipeline
        .rank_scored("CLASSROOM_NOISE", Language::En, 10, None)
        .await
        .unwrap();

    assert_eq!(label, SourceLabel::WebSearch);
    let urls: Vec<_> = scored.iter().map(|r| r.content.content_url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/first",
            "https://example.com/second",
            "https://example.com/third",
        ]
    );
    for ranked in &scored {
        assert_eq!(ranked.stats.feedback_count, 0);
    }
}

#[tokio::test]
async fn failed_web_search_yields_empty_internal() {
    let pool = empty_pool().await;
    add_concept(&pool, "SCI_PHY_TEMPERATURE", "science", "Heat and temperature").await;

    let pipeline = ContentPipeline::new(pool)
        .with_ai(Arc::new(ScriptedAi::default()))
        .with_web_search(Arc::new(FailingWebSearch));

    let (items, label) = pipeline
        .rank("SCI_PHY_TEMPERATURE", Language::En, 10, None)
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(label, SourceLabel::Internal);
}

#[tokio::test]
async fn unknown_concept_skips_the_web_entirely() {
    let pool = empty_pool().await;
    let web = Arc::new(FakeWebSearch {
        hits: vec![hit("Anything", "https://example.com/anything", "x")],
        ..Default::default()
    });
    let pipeline = ContentPipeline::new(pool).with_web_search(web.clone());

    let (items, label) = pipeline
        .rank("NO_SUCH_CONCEPT", Language::En, 10, None)
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(label, SourceLabel::Internal);
    assert_eq!(web.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scored_ranking_prefers_target_language_over_score() {
    let pool = empty_pool().await;
    add_concept(&pool, "MATH_MULTIPLICATION", "math", "Multiplying numbers").await;
    let english = add_content(
        &pool,
        "MATH_MULTIPLICATION",
        "https://example.com/english-tables",
        Language::En,
        true,
        SourceType::Internal,
        0,
    )
    .await;
    let hindi = add_content(
        &pool,
        "MATH_MULTIPLICATION",
        "https://example.com/hindi-tables",
        Language::Hi,
        true,
        SourceType::Internal,
        60,
    )
    .await;
    feedback::record_feedback(&pool, &english.id, Some("teacher-1"), true, Some(5), None)
        .await
        .unwrap();

    let pipeline = ContentPipeline::new(pool);
    let (scored, _) = pipeline
        .rank_scored("MATH_MULTIPLICATION", Language::Hi, 10, None)
        .await
        .unwrap();

    // A perfect score cannot beat a language match
    assert_eq!(scored[0].content.id, hindi.id);
    assert_eq!(scored[1].content.id, english.id);
}
