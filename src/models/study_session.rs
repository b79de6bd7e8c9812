use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Open-ended study session (`sessions` table), closed by the client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
}

/// Minutes logged by the study-time tracker (`user_sessions` table).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyTimeEntry {
    pub id: Uuid,
    pub user_id: String,
    pub session_date: NaiveDate,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}
