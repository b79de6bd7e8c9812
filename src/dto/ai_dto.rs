use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::message::ChatMessage;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub subject: Option<String>,
    pub num_questions: Option<u32>,
    pub difficulty: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardsRequest {
    pub subject: Option<String>,
    pub flashcard_count: Option<u32>,
    pub difficulty: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmartNotesRequest {
    pub content: Option<String>,
    pub output_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SmartNotesResponse {
    pub content: String,
    pub success: bool,
}
