use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value as JsonValue};

use crate::{
    dto::ai_dto::{
        ChatRequest, GenerateFlashcardsRequest, GenerateQuizRequest, SmartNotesRequest,
        SmartNotesResponse,
    },
    error::{Error, ProviderError, Result},
    services::ai_service::NotesKind,
    utils::{
        extract::ApiJson,
        validation::{non_empty, require_all},
    },
    AppState,
};

const MISSING_FIELDS: &str = "Missing required fields";

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Coach reply with token usage"),
        (status = 400, description = "No messages")
    ),
    tag = "ai"
)]
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> Result<Response> {
    let messages = payload
        .messages
        .filter(|m| !m.is_empty())
        .ok_or_else(|| Error::BadRequest("Messages are required".into()))?;

    match state.ai_service.coach_reply(&messages).await {
        Ok(reply) => Ok(Json(reply).into_response()),
        Err(ProviderError::Status { status, .. }) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((code, Json(json!({ "error": "Failed to get response from AI" }))).into_response())
        }
        Err(ProviderError::InvalidResponse(_)) => Err(Error::Internal("Invalid response from AI".into())),
        Err(e) => {
            tracing::error!("Chat API error: {}", e);
            Err(Error::Internal("Internal server error".into()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/generate-quiz",
    request_body = GenerateQuizRequest,
    responses(
        (status = 200, description = "Quiz JSON as produced by the model"),
        (status = 400, description = "Missing required fields"),
        (status = 500, description = "Failed to generate quiz")
    ),
    tag = "ai"
)]
#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GenerateQuizRequest>,
) -> Result<Json<JsonValue>> {
    let num_questions = payload.num_questions.unwrap_or(0);
    require_all(
        &[
            non_empty(&payload.subject).is_some(),
            num_questions > 0,
            non_empty(&payload.difficulty).is_some(),
            non_empty(&payload.language).is_some(),
        ],
        MISSING_FIELDS,
    )?;

    let quiz = state
        .ai_service
        .generate_quiz(
            non_empty(&payload.subject).unwrap_or_default(),
            num_questions,
            non_empty(&payload.difficulty).unwrap_or_default(),
            non_empty(&payload.language).unwrap_or_default(),
        )
        .await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    post,
    path = "/api/generate-flashcards",
    request_body = GenerateFlashcardsRequest,
    responses(
        (status = 200, description = "Flashcards JSON as produced by the model"),
        (status = 400, description = "Missing required fields"),
        (status = 500, description = "Failed to generate flashcards")
    ),
    tag = "ai"
)]
#[axum::debug_handler]
pub async fn generate_flashcards(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GenerateFlashcardsRequest>,
) -> Result<Json<JsonValue>> {
    let count = payload.flashcard_count.unwrap_or(0);
    require_all(
        &[
            non_empty(&payload.subject).is_some(),
            count > 0,
            non_empty(&payload.difficulty).is_some(),
        ],
        MISSING_FIELDS,
    )?;

    let language = payload.language.as_deref().unwrap_or("English");
    let cards = state
        .ai_service
        .generate_flashcards(
            non_empty(&payload.subject).unwrap_or_default(),
            count,
            non_empty(&payload.difficulty).unwrap_or_default(),
            language,
        )
        .await?;
    Ok(Json(cards))
}

#[utoipa::path(
    post,
    path = "/api/smart-notes",
    request_body = SmartNotesRequest,
    responses(
        (status = 200, description = "Generated study material", body = SmartNotesResponse),
        (status = 400, description = "Content and output type are required"),
        (status = 500, description = "Failed to generate smart notes")
    ),
    tag = "ai"
)]
#[axum::debug_handler]
pub async fn smart_notes(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SmartNotesRequest>,
) -> Result<Json<SmartNotesResponse>> {
    let (Some(content), Some(output_type)) =
        (non_empty(&payload.content), non_empty(&payload.output_type))
    else {
        return Err(Error::BadRequest(
            "Content and output type are required".into(),
        ));
    };

    let content = state
        .ai_service
        .smart_notes(content, NotesKind::parse(output_type))
        .await?;

    Ok(Json(SmartNotesResponse {
        content,
        success: true,
    }))
}
