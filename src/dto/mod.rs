pub mod ai_dto;
pub mod billing_dto;
pub mod content_dto;
pub mod exam_dto;
pub mod study_dto;
