use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::study_dto::{
        DailyStudyTime, DaysQuery, LoggedMinutes, SessionDurationRequest, StartedResponse,
        StudyClockStatus, TodaySessions,
    },
    error::Result,
    middleware::auth::Claims,
    models::study_session::StudySession,
    services::session_service::{daily_study_time, total_seconds, Lap},
    utils::{
        extract::{ApiJson, ApiQuery},
        time,
    },
    AppState,
};

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<StartedResponse>)> {
    let id = state.session_service.start_session(&claims.sub).await?;
    Ok((StatusCode::CREATED, Json(StartedResponse { id })))
}

#[axum::debug_handler]
pub async fn update_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<SessionDurationRequest>,
) -> Result<Json<StudySession>> {
    payload.validate()?;
    let session = state
        .session_service
        .update_duration(&claims.sub, id, payload.duration_seconds)
        .await?;
    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn end_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<SessionDurationRequest>,
) -> Result<Json<StudySession>> {
    payload.validate()?;
    let session = state
        .session_service
        .end_session(&claims.sub, id, payload.duration_seconds)
        .await?;
    tracing::info!(user_id = %claims.sub, session_id = %id, seconds = session.duration_seconds, "Study session ended");
    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn today(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TodaySessions>> {
    let day_start = time::start_of_day(time::now().date_naive());
    let sessions = state
        .session_service
        .sessions_since(&claims.sub, day_start)
        .await?;
    let total_seconds = total_seconds(&sessions);
    Ok(Json(TodaySessions {
        sessions,
        total_seconds,
    }))
}

// Study-time clock. Minutes are logged per UTC day into `user_sessions`.

#[axum::debug_handler]
pub async fn start_clock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<StudyClockStatus> {
    let now = time::now();
    state.study_clock.start(&claims.sub, now);
    let (active, minutes) = state.study_clock.current(&claims.sub, now);
    Json(StudyClockStatus { active, minutes })
}

#[axum::debug_handler]
pub async fn checkpoint_clock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<LoggedMinutes>> {
    let now = time::now();
    let lap = state.study_clock.checkpoint(&claims.sub, now);
    log(&state, &claims.sub, now, lap).await
}

#[axum::debug_handler]
pub async fn stop_clock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<LoggedMinutes>> {
    let now = time::now();
    let lap = state.study_clock.stop(&claims.sub, now);
    log(&state, &claims.sub, now, lap).await
}

async fn log(
    state: &AppState,
    user_id: &str,
    now: chrono::DateTime<chrono::Utc>,
    lap: Option<Lap>,
) -> Result<Json<LoggedMinutes>> {
    let Some(lap) = lap else {
        return Ok(Json(LoggedMinutes { logged_minutes: 0 }));
    };
    let minutes = lap.minutes;
    if let Err(err) = state
        .session_service
        .log_minutes(user_id, now.date_naive(), minutes)
        .await
    {
        tracing::warn!(user_id, minutes, "Study time not stored, clock restored");
        state.study_clock.restore(lap);
        return Err(err);
    }
    Ok(Json(LoggedMinutes {
        logged_minutes: minutes,
    }))
}

#[axum::debug_handler]
pub async fn current_clock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<StudyClockStatus> {
    let (active, minutes) = state.study_clock.current(&claims.sub, time::now());
    Json(StudyClockStatus { active, minutes })
}

#[axum::debug_handler]
pub async fn study_time_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<Vec<DailyStudyTime>>> {
    query.validate()?;
    let since = time::days_ago(time::now(), query.days.unwrap_or(7)).date_naive();

    let entries = state
        .session_service
        .study_time_since(&claims.sub, since)
        .await?;
    Ok(Json(daily_study_time(&entries)))
}
