use crate::error::{Error, Result};
use crate::models::pomodoro::PomodoroSession;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const POMODORO_COLUMNS: &str =
    "id, user_id, duration_minutes, completed, started_at, completed_at, created_at";

#[derive(Clone)]
pub struct PomodoroService {
    pool: PgPool,
}

impl PomodoroService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start(&self, user_id: &str, duration_minutes: i32) -> Result<PomodoroSession> {
        let session = sqlx::query_as::<_, PomodoroSession>(&format!(
            r#"
            INSERT INTO pomodoro_sessions (user_id, duration_minutes, completed, started_at)
            VALUES ($1, $2, FALSE, NOW())
            RETURNING {}
            "#,
            POMODORO_COLUMNS
        ))
        .bind(user_id)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Completing twice keeps the first completion time.
    pub async fn complete(&self, user_id: &str, id: Uuid) -> Result<PomodoroSession> {
        let session = sqlx::query_as::<_, PomodoroSession>(&format!(
            r#"
            UPDATE pomodoro_sessions
            SET completed = TRUE,
                completed_at = COALESCE(completed_at, NOW())
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            POMODORO_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        session.ok_or_else(|| Error::NotFound("Pomodoro session not found".into()))
    }

    pub async fn list_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PomodoroSession>> {
        let sessions = sqlx::query_as::<_, PomodoroSession>(&format!(
            r#"
            SELECT {}
            FROM pomodoro_sessions
            WHERE user_id = $1 AND started_at >= $2
            ORDER BY started_at DESC
            "#,
            POMODORO_COLUMNS
        ))
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }
}
