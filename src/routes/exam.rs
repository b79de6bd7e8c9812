use axum::{extract::State, response::Json};

use crate::{
    dto::exam_dto::{
        ExamSubmission, ExamSubmissionResponse, GenerateExamRequest, GenerateExamResponse,
        GeneratedExamEnvelope,
    },
    error::{Error, Result},
    services::{ai_service::detect_exam_type, grading_service::calculate_exam_results},
    utils::{extract::ApiJson, validation::non_empty},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/submit-exam",
    request_body = ExamSubmission,
    responses(
        (status = 200, description = "Exam graded", body = ExamSubmissionResponse),
        (status = 400, description = "Missing exam data")
    ),
    tag = "exam"
)]
#[axum::debug_handler]
pub async fn submit_exam(
    ApiJson(payload): ApiJson<ExamSubmission>,
) -> Result<Json<ExamSubmissionResponse>> {
    let (Some(answers), Some(questions)) = (payload.answers, payload.questions) else {
        return Err(Error::BadRequest("Missing exam data".into()));
    };

    let result = calculate_exam_results(&answers, &questions, payload.time_taken);
    tracing::info!(
        score = result.score,
        correct = result.correct_answers,
        total = result.total_questions,
        "Exam submitted"
    );

    Ok(Json(ExamSubmissionResponse {
        success: true,
        result,
    }))
}

#[utoipa::path(
    post,
    path = "/api/generate-exam",
    request_body = GenerateExamRequest,
    responses(
        (status = 200, description = "Exam generated from the uploaded document"),
        (status = 400, description = "No document content provided"),
        (status = 500, description = "Error generating exam")
    ),
    tag = "exam"
)]
#[axum::debug_handler]
pub async fn generate_exam(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GenerateExamRequest>,
) -> Result<Json<GenerateExamResponse>> {
    let Some(text) = non_empty(&payload.extracted_text) else {
        tracing::error!("No extracted text provided");
        return Err(Error::BadRequest("No document content provided".into()));
    };

    let exam_type = detect_exam_type(text);
    tracing::info!(
        exam_type = exam_type.as_str(),
        difficulty = ?payload.difficulty,
        question_count = ?payload.question_count,
        "Generating exam"
    );

    let content = state
        .ai_service
        .generate_exam(text, exam_type, payload.duration)
        .await?;

    Ok(Json(GenerateExamResponse {
        success: true,
        exam: GeneratedExamEnvelope {
            duration: payload.duration,
            allow_documents: payload.allow_documents,
            allow_calculator: payload.allow_calculator,
            exam_type,
            content,
        },
    }))
}
