pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    ai_service::AiService, checkout_service::CheckoutService, content_service::ContentService,
    flashcard_service::FlashcardService, pomodoro_service::PomodoroService,
    score_service::ScoreService, session_service::{SessionService, StudyClock},
    user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ai_service: AiService,
    pub content_service: ContentService,
    pub checkout_service: CheckoutService,
    pub user_service: UserService,
    pub flashcard_service: FlashcardService,
    pub score_service: ScoreService,
    pub session_service: SessionService,
    pub pomodoro_service: PomodoroService,
    pub study_clock: StudyClock,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self::with_ai_service(
            pool,
            AiService::openrouter(http_client.clone(), &config),
            http_client,
            config,
        ))
    }

    /// Same as [`AppState::new`] with a caller-provided LLM gateway.
    pub fn with_ai_service(
        pool: PgPool,
        ai_service: AiService,
        http_client: Client,
        config: Config,
    ) -> Self {
        let content_service = ContentService::new(http_client.clone(), &config);
        let checkout_service = CheckoutService::new(http_client, &config);

        Self {
            user_service: UserService::new(pool.clone()),
            flashcard_service: FlashcardService::new(pool.clone()),
            score_service: ScoreService::new(pool.clone()),
            session_service: SessionService::new(pool.clone()),
            pomodoro_service: PomodoroService::new(pool.clone()),
            study_clock: StudyClock::new(),
            pool,
            config: Arc::new(config),
            ai_service,
            content_service,
            checkout_service,
        }
    }
}
