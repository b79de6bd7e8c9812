use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use validator::Validate;

use crate::{
    dto::study_dto::{
        DailyScores, DaysQuery, RecentScore, SaveScoreRequest, ScoreQuery, ScoreSummary,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    models::score::{QuizType, UserScore},
    services::score_service::{daily_chart, recent_scores},
    utils::{
        extract::{ApiJson, ApiQuery},
        time,
        validation::non_empty,
    },
    AppState,
};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

fn parse_quiz_type(value: &str) -> Result<QuizType> {
    QuizType::parse(value)
        .ok_or_else(|| Error::BadRequest(format!("Unknown quiz type: {}", value)))
}

fn quiz_type_filter(query: &ScoreQuery) -> Result<Option<QuizType>> {
    non_empty(&query.quiz_type).map(parse_quiz_type).transpose()
}

#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<SaveScoreRequest>,
) -> Result<(StatusCode, Json<UserScore>)> {
    payload.validate()?;
    let quiz_type = parse_quiz_type(&payload.quiz_type)?;
    if payload.score > payload.total_questions {
        return Err(Error::BadRequest(
            "Score cannot exceed the number of questions".into(),
        ));
    }

    let row = state
        .score_service
        .save_score(&claims.sub, quiz_type, payload.score, payload.total_questions)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<ScoreQuery>,
) -> Result<Json<Vec<RecentScore>>> {
    let quiz_type = quiz_type_filter(&query)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let rows = state
        .score_service
        .recent(&claims.sub, quiz_type, limit)
        .await?;
    Ok(Json(recent_scores(&rows)))
}

#[axum::debug_handler]
pub async fn summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<ScoreQuery>,
) -> Result<Json<ScoreSummary>> {
    let quiz_type = quiz_type_filter(&query)?;
    Ok(Json(state.score_service.summary(&claims.sub, quiz_type).await?))
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<Vec<DailyScores>>> {
    query.validate()?;
    let since = time::days_before(time::now(), query.days.unwrap_or(30));

    let rows = state.score_service.scores_since(&claims.sub, since).await?;
    Ok(Json(daily_chart(&rows, since)))
}
