pub mod exam;
pub mod flashcard;
pub mod message;
pub mod pomodoro;
pub mod score;
pub mod study_session;
pub mod user;
