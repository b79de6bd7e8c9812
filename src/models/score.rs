use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserScore {
    pub id: Uuid,
    pub user_id: String,
    pub quiz_type: String,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserScore {
    pub fn percentage(&self) -> i64 {
        percentage(self.score, self.total_questions)
    }
}

pub fn percentage(score: i32, total: i32) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    ExamMode,
    QuizAi,
}

impl QuizType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exam_mode" => Some(QuizType::ExamMode),
            "quiz_ai" => Some(QuizType::QuizAi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::ExamMode => "exam_mode",
            QuizType::QuizAi => "quiz_ai",
        }
    }
}
