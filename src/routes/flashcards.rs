use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::study_dto::{FlashcardQuery, ReviewFlashcardRequest, SaveFlashcardsRequest},
    error::{Error, Result},
    middleware::auth::Claims,
    models::flashcard::{Flashcard, FlashcardTopic},
    utils::{
        extract::{ApiJson, ApiQuery},
        validation::non_empty,
    },
    AppState,
};

#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<SaveFlashcardsRequest>,
) -> Result<(StatusCode, Json<Vec<Flashcard>>)> {
    payload.validate()?;
    let topic = payload.topic.trim();
    if topic.is_empty() {
        return Err(Error::BadRequest("Topic is required".into()));
    }

    let saved = state
        .flashcard_service
        .save_flashcards(&claims.sub, topic, &payload.flashcards)
        .await?;
    tracing::info!(user_id = %claims.sub, topic, count = saved.len(), "Flashcards saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<FlashcardQuery>,
) -> Result<Json<Vec<Flashcard>>> {
    let cards = state
        .flashcard_service
        .list(&claims.sub, non_empty(&query.topic))
        .await?;
    Ok(Json(cards))
}

#[axum::debug_handler]
pub async fn topics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<FlashcardTopic>>> {
    Ok(Json(state.flashcard_service.topics(&claims.sub).await?))
}

#[axum::debug_handler]
pub async fn review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<ReviewFlashcardRequest>,
) -> Result<Json<Flashcard>> {
    payload.validate()?;
    let card = state
        .flashcard_service
        .review(&claims.sub, id, payload.difficulty_level)
        .await?;
    Ok(Json(card))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.flashcard_service.delete(&claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
