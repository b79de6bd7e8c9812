pub mod ai_service;
pub mod checkout_service;
pub mod content_service;
pub mod flashcard_service;
pub mod grading_service;
pub mod pomodoro_service;
pub mod score_service;
pub mod session_service;
pub mod user_service;
