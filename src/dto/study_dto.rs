use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::flashcard::FlashcardDraft;
use crate::models::study_session::StudySession;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveFlashcardsRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    #[validate(length(min = 1, max = 200))]
    pub flashcards: Vec<FlashcardDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFlashcardRequest {
    #[validate(range(min = 1, max = 5))]
    pub difficulty_level: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveScoreRequest {
    pub quiz_type: String,
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 1))]
    pub total_questions: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreQuery {
    pub quiz_type: Option<String>,
    pub limit: Option<i64>,
}

/// Dashboard window. Capped at ten years so date arithmetic stays in range.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DaysQuery {
    #[validate(range(min = 0, max = 3650))]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScore {
    pub date: NaiveDate,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub average_percentage: i64,
    pub attempts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyScores {
    pub date: NaiveDate,
    #[serde(rename = "examMode")]
    pub exam_mode: i64,
    #[serde(rename = "quizAI")]
    pub quiz_ai: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartedResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionDurationRequest {
    #[validate(range(min = 0))]
    pub duration_seconds: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySessions {
    pub sessions: Vec<StudySession>,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyClockStatus {
    pub active: bool,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedMinutes {
    pub logged_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStudyTime {
    pub date: NaiveDate,
    pub minutes: i64,
    pub hours: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartPomodoroRequest {
    #[validate(range(min = 1, max = 180))]
    pub duration_minutes: i32,
}
