use crate::dto::study_dto::{DailyScores, RecentScore, ScoreSummary};
use crate::error::Result;
use crate::models::score::{percentage, QuizType, UserScore};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;

const SCORE_COLUMNS: &str =
    "id, user_id, quiz_type, score, total_questions, completed_at, created_at";

#[derive(Clone)]
pub struct ScoreService {
    pool: PgPool,
}

impl ScoreService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save_score(
        &self,
        user_id: &str,
        quiz_type: QuizType,
        score: i32,
        total_questions: i32,
    ) -> Result<UserScore> {
        let row = sqlx::query_as::<_, UserScore>(&format!(
            r#"
            INSERT INTO user_scores (user_id, quiz_type, score, total_questions, completed_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {}
            "#,
            SCORE_COLUMNS
        ))
        .bind(user_id)
        .bind(quiz_type.as_str())
        .bind(score)
        .bind(total_questions)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "Score saved: {}/{} for {}",
            score,
            total_questions,
            quiz_type.as_str()
        );
        Ok(row)
    }

    /// Latest `limit` scores of a user, newest first, optionally limited to
    /// one quiz type.
    pub async fn recent(
        &self,
        user_id: &str,
        quiz_type: Option<QuizType>,
        limit: i64,
    ) -> Result<Vec<UserScore>> {
        let rows = sqlx::query_as::<_, UserScore>(&format!(
            r#"
            SELECT {}
            FROM user_scores
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR quiz_type = $2)
            ORDER BY completed_at DESC
            LIMIT $3
            "#,
            SCORE_COLUMNS
        ))
        .bind(user_id)
        .bind(quiz_type.map(|q| q.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Scores completed at or after `since`, oldest first.
    pub async fn scores_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserScore>> {
        let rows = sqlx::query_as::<_, UserScore>(&format!(
            r#"
            SELECT {}
            FROM user_scores
            WHERE user_id = $1 AND completed_at >= $2
            ORDER BY completed_at ASC
            "#,
            SCORE_COLUMNS
        ))
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Attempt count and mean unrounded percentage, computed in Postgres.
    pub async fn summary(
        &self,
        user_id: &str,
        quiz_type: Option<QuizType>,
    ) -> Result<ScoreSummary> {
        let (attempts, average): (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   AVG(score::FLOAT8 * 100 / total_questions) FILTER (WHERE total_questions > 0)
            FROM user_scores
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR quiz_type = $2)
            "#,
        )
        .bind(user_id)
        .bind(quiz_type.map(|q| q.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(summary_from(attempts, average))
    }
}

pub fn recent_scores(rows: &[UserScore]) -> Vec<RecentScore> {
    rows.iter()
        .map(|s| RecentScore {
            date: s.completed_at.date_naive(),
            score: s.score,
            total_questions: s.total_questions,
            percentage: s.percentage(),
        })
        .collect()
}

/// The average is rounded once, after averaging unrounded percentages.
pub fn summary_from(attempts: i64, average: Option<f64>) -> ScoreSummary {
    ScoreSummary {
        average_percentage: average.map(|a| a.round() as i64).unwrap_or(0),
        attempts,
    }
}

fn mean_rounded(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<i64>() as f64 / values.len() as f64).round() as i64
}

/// Per-day averages of the rounded percentages for each quiz type, oldest
/// day first. Days without attempts of a type report 0 for it.
pub fn daily_chart(rows: &[UserScore], since: DateTime<Utc>) -> Vec<DailyScores> {
    let mut by_day: BTreeMap<NaiveDate, (Vec<i64>, Vec<i64>)> = BTreeMap::new();

    for s in rows.iter().filter(|s| s.completed_at >= since) {
        let entry = by_day.entry(s.completed_at.date_naive()).or_default();
        match QuizType::parse(&s.quiz_type) {
            Some(QuizType::ExamMode) => entry.0.push(percentage(s.score, s.total_questions)),
            Some(QuizType::QuizAi) => entry.1.push(percentage(s.score, s.total_questions)),
            None => {}
        }
    }

    by_day
        .into_iter()
        .map(|(date, (exam, quiz))| DailyScores {
            date,
            exam_mode: mean_rounded(&exam),
            quiz_ai: mean_rounded(&quiz),
        })
        .collect()
}
