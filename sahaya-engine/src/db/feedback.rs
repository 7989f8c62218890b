//! Content feedback operations
//!
//! Feedback rows are written as teachers report back on material; the
//! aggregate is computed on demand and only ever re-sorts results within
//! an already-chosen ranking tier.

use chrono::Utc;
use sahaya_common::models::{ContentFeedback, FeedbackStats};
use sahaya_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Record one teacher's verdict on a content item
pub async fn record_feedback(
    pool: &SqlitePool,
    content_id: &str,
    teacher_id: Option<&str>,
    worked: bool,
    rating: Option<i64>,
    comment: Option<&str>,
) -> Result<ContentFeedback> {
    if let Some(rating) = rating {
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
    }

    let feedback = ContentFeedback {
        id: Uuid::new_v4().to_string(),
        content_id: content_id.to_string(),
        teacher_id: teacher_id.map(str::to_string),
        worked,
        rating,
        comment: comment.map(str::to_string),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO content_feedback (id, content_id, teacher_id, worked, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&feedback.id)
    .bind(&feedback.content_id)
    .bind(&feedback.teacher_id)
    .bind(feedback.worked as i64)
    .bind(feedback.rating)
    .bind(&feedback.comment)
    .bind(feedback.created_at)
    .execute(pool)
    .await?;

    Ok(feedback)
}

/// Aggregate feedback for one content item
///
/// Mean rating ignores rows without a rating; the success ratio is the
/// fraction of rows with `worked = true`. Both are 0.0 when no feedback
/// exists.
pub async fn feedback_stats(pool: &SqlitePool, content_id: &str) -> Result<FeedbackStats> {
    let row = sqlx::query(
        r#"
        SELECT AVG(rating) AS avg_rating,
               AVG(CASE WHEN worked != 0 THEN 1.0 ELSE 0.0 END) AS success_ratio,
               COUNT(*) AS feedback_count
        FROM content_feedback
        WHERE content_id = ?
        "#,
    )
    .bind(content_id)
    .fetch_one(pool)
    .await?;

    let avg_rating: Option<f64> = row.get("avg_rating");
    let success_ratio: Option<f64> = row.get("success_ratio");

    Ok(FeedbackStats {
        avg_rating: avg_rating.unwrap_or(0.0),
        success_ratio: success_ratio.unwrap_or(0.0),
        feedback_count: row.get("feedback_count"),
    })
}
