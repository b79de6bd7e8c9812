pub mod ai;
pub mod billing;
pub mod content;
pub mod docs;
pub mod exam;
pub mod flashcards;
pub mod health;
pub mod pomodoro;
pub mod scores;
pub mod sessions;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{
        auth::require_bearer_auth,
        cors::permissive_cors,
        rate_limit::{new_rps_state, rps_middleware},
    },
    AppState,
};

const BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi_json));

    let public_api = Router::new()
        .route("/api/submit-exam", post(exam::submit_exam))
        .route("/api/extract-pdf", post(content::extract_pdf))
        .route("/api/upload-pdf", post(content::upload_pdf))
        .route("/api/transcribe-youtube", post(content::transcribe_youtube))
        .route("/api/webhooks/stripe", post(billing::stripe_webhook));

    let ai_api = Router::new()
        .route("/api/chat", post(ai::chat))
        .route("/api/generate-quiz", post(ai::generate_quiz))
        .route("/api/generate-flashcards", post(ai::generate_flashcards))
        .route("/api/generate-exam", post(exam::generate_exam))
        .route("/api/smart-notes", post(ai::smart_notes))
        .route("/api/transcribe-audio", post(content::transcribe_audio))
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(state.config.ai_rps),
            rps_middleware,
        ));

    let user_api = Router::new()
        .route("/api/checkout", post(billing::checkout))
        .route("/api/users/sync", post(users::sync))
        .route("/api/users/me", get(users::me))
        .route(
            "/api/flashcards",
            get(flashcards::list).post(flashcards::save),
        )
        .route("/api/flashcards/topics", get(flashcards::topics))
        .route("/api/flashcards/:id", delete(flashcards::delete))
        .route("/api/flashcards/:id/review", post(flashcards::review))
        .route("/api/scores", get(scores::list).post(scores::save))
        .route("/api/scores/summary", get(scores::summary))
        .route("/api/dashboard/scores", get(scores::dashboard))
        .route("/api/sessions", post(sessions::start_session))
        .route("/api/sessions/today", get(sessions::today))
        .route("/api/sessions/:id", patch(sessions::update_session))
        .route("/api/sessions/:id/end", post(sessions::end_session))
        .route("/api/study-time/start", post(sessions::start_clock))
        .route("/api/study-time/checkpoint", post(sessions::checkpoint_clock))
        .route("/api/study-time/stop", post(sessions::stop_clock))
        .route("/api/study-time/current", get(sessions::current_clock))
        .route("/api/dashboard/study-time", get(sessions::study_time_dashboard))
        .route("/api/pomodoro", get(pomodoro::list).post(pomodoro::start))
        .route("/api/pomodoro/:id/complete", post(pomodoro::complete))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    base_routes
        .merge(public_api)
        .merge(ai_api)
        .merge(user_api)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
