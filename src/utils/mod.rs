pub mod crypto;
pub mod extract;
pub mod language;
pub mod text;
pub mod time;
pub mod validation;
