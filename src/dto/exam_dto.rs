use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::exam::{
    lenient, Answer, ExamQuestion, ExamResult, ExamType, GeneratedExam,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamSubmission {
    #[schema(value_type = Option<Vec<Object>>)]
    pub answers: Option<Vec<Option<Answer>>>,
    /// Elapsed seconds.
    #[serde(default, deserialize_with = "lenient::seconds")]
    pub time_taken: i64,
    pub questions: Option<Vec<ExamQuestion>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExamSubmissionResponse {
    pub success: bool,
    pub result: ExamResult,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateExamRequest {
    pub duration: Option<u32>,
    #[serde(default)]
    pub allow_documents: bool,
    #[serde(default)]
    pub allow_calculator: bool,
    pub difficulty: Option<String>,
    pub question_count: Option<u32>,
    pub extracted_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExamEnvelope {
    pub duration: Option<u32>,
    pub allow_documents: bool,
    pub allow_calculator: bool,
    #[serde(rename = "type")]
    pub exam_type: ExamType,
    pub content: GeneratedExam,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateExamResponse {
    pub success: bool,
    pub exam: GeneratedExamEnvelope,
}
