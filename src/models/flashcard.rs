use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub id: Uuid,
    pub user_id: String,
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub difficulty_level: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FlashcardTopic {
    pub topic: String,
    pub card_count: i64,
}

/// A generated card before it is stored: `front` becomes the question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardDraft {
    pub front: String,
    pub back: String,
}
