//! Help request audit trail
//!
//! Every resolution attempt can be persisted here. Rows with a NULL
//! concept id are the queries the cascade could not resolve; the gap
//! report groups them so content authors can see what teachers are
//! searching for and not finding.

use chrono::{DateTime, Utc};
use sahaya_common::models::HelpRequest;
use sahaya_common::{Language, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One unresolved query, aggregated for gap analysis
#[derive(Debug, Clone)]
pub struct UnresolvedQuery {
    pub normalized_text: String,
    pub detected_language: Language,
    pub occurrences: i64,
    pub last_seen: DateTime<Utc>,
}

/// Persist one resolution attempt, resolved or not
pub async fn record_help_request(
    pool: &SqlitePool,
    query_text: &str,
    detected_language: Language,
    normalized_text: &str,
    concept_id: Option<&str>,
) -> Result<HelpRequest> {
    let request = HelpRequest {
        id: Uuid::new_v4().to_string(),
        query_text: query_text.to_string(),
        detected_language,
        normalized_text: normalized_text.to_string(),
        concept_id: concept_id.map(str::to_string),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO help_requests (id, query_text, detected_language, normalized_text, concept_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&request.id)
    .bind(&request.query_text)
    .bind(request.detected_language.as_str())
    .bind(&request.normalized_text)
    .bind(&request.concept_id)
    .bind(request.created_at)
    .execute(pool)
    .await?;

    Ok(request)
}

/// Unresolved queries grouped by normalized text, newest first
pub async fn unresolved_help_requests(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<UnresolvedQuery>> {
    let rows = sqlx::query(
        r#"
        SELECT normalized_text, detected_language,
               COUNT(*) AS occurrences, MAX(created_at) AS last_seen
        FROM help_requests
        WHERE concept_id IS NULL
        GROUP BY normalized_text, detected_language
        ORDER BY last_seen DESC
        LIMIT ?
        "#,
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let language: String = row.get("detected_language");
            Ok(UnresolvedQuery {
                normalized_text: row.get("normalized_text"),
                detected_language: language.parse()?,
                occurrences: row.get("occurrences"),
                last_seen: row.get("last_seen"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahaya_common::db::init_memory_database;

    #[tokio::test]
    async fn records_resolved_and_unresolved_attempts() {
        let pool = init_memory_database().await.unwrap();

        record_help_request(&pool, "fractions", Language::En, "fractions", Some("MATH_FRACTIONS"))
            .await
            .unwrap();
        record_help_request(&pool, "Plate tectonics", Language::En, "plate tectonics", None)
            .await
            .unwrap();

        let gaps = unresolved_help_requests(&pool, 10).await.unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].normalized_text, "plate tectonics");
        assert_eq!(gaps[0].occurrences, 1);
    }

    #[tokio::test]
    async fn gap_report_groups_repeated_queries() {
        let pool = init_memory_database().await.unwrap();

        for _ in 0..3 {
            record_help_request(&pool, "plate tectonics", Language::En, "plate tectonics", None)
                .await
                .unwrap();
        }
        record_help_request(&pool, "ಜ್ವಾಲಾಮುಖಿ", Language::Kn, "ಜ್ವಾಲಾಮುಖಿ", None)
            .await
            .unwrap();

        let gaps = unresolved_help_requests(&pool, 10).await.unwrap();
        assert_eq!(gaps.len(), 2);

        let tectonics = gaps
            .iter()
            .find(|g| g.normalized_text == "plate tectonics")
            .unwrap();
        assert_eq!(tectonics.occurrences, 3);
        assert_eq!(tectonics.detected_language, Language::En);
    }

    #[tokio::test]
    async fn gap_report_respects_limit() {
        let pool = init_memory_database().await.unwrap();
        for i in 0..5 {
            record_help_request(&pool, &format!("query {}", i), Language::En, &format!("query {}", i), None)
                .await
                .unwrap();
        }

        let gaps = unresolved_help_requests(&pool, 2).await.unwrap();
        assert_eq!(gaps.len(), 2);
    }
}
