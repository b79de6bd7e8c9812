use serde::{Deserialize, Serialize};

use crate::models::exam::ExamType;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    /// `mixed` when the text mentions figures or diagrams, else `text`.
    #[serde(rename = "type")]
    pub kind: String,
    pub has_questions: bool,
    pub has_math: bool,
    pub has_multiple_choice: bool,
    pub exam_type: ExamType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPdfResponse {
    pub success: bool,
    pub filename: String,
    pub extracted_text: String,
    pub content_type: ContentAnalysis,
    pub pages: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPdfResponse {
    pub success: bool,
    pub filename: String,
    pub extracted_text: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeYoutubeRequest {
    pub url: Option<String>,
}
