use axum::response::Json;
use utoipa::OpenApi;

use crate::{
    dto::{
        ai_dto::{
            ChatRequest, GenerateFlashcardsRequest, GenerateQuizRequest, SmartNotesRequest,
            SmartNotesResponse,
        },
        exam_dto::{ExamSubmission, ExamSubmissionResponse, GenerateExamRequest},
    },
    models::{
        exam::{ExamQuestion, ExamResult, ExamResultQuestion, ExamType},
        message::ChatMessage,
    },
};

use super::{ai, exam};

#[derive(OpenApi)]
#[openapi(
    paths(
        exam::submit_exam,
        exam::generate_exam,
        ai::chat,
        ai::generate_quiz,
        ai::generate_flashcards,
        ai::smart_notes,
    ),
    components(schemas(
        ExamSubmission,
        ExamSubmissionResponse,
        ExamQuestion,
        ExamResult,
        ExamResultQuestion,
        ExamType,
        GenerateExamRequest,
        ChatMessage,
        ChatRequest,
        GenerateQuizRequest,
        GenerateFlashcardsRequest,
        SmartNotesRequest,
        SmartNotesResponse,
    )),
    tags(
        (name = "exam", description = "Exam grading and generation"),
        (name = "ai", description = "Study coach and generators")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
