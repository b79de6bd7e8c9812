use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::study_dto::{DaysQuery, StartPomodoroRequest},
    error::Result,
    middleware::auth::Claims,
    models::pomodoro::PomodoroSession,
    utils::{
        extract::{ApiJson, ApiQuery},
        time,
    },
    AppState,
};

#[axum::debug_handler]
pub async fn start(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<StartPomodoroRequest>,
) -> Result<(StatusCode, Json<PomodoroSession>)> {
    payload.validate()?;
    let session = state
        .pomodoro_service
        .start(&claims.sub, payload.duration_minutes)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[axum::debug_handler]
pub async fn complete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PomodoroSession>> {
    Ok(Json(state.pomodoro_service.complete(&claims.sub, id).await?))
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<Vec<PomodoroSession>>> {
    query.validate()?;
    let since = time::days_ago(time::now(), query.days.unwrap_or(30));
    Ok(Json(
        state.pomodoro_service.list_since(&claims.sub, since).await?,
    ))
}
