use crate::error::{Error, Result};

/// Absent and empty strings both count as missing.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn require_all(present: &[bool], message: &str) -> Result<()> {
    if present.iter().all(|p| *p) {
        Ok(())
    } else {
        Err(Error::BadRequest(message.to_string()))
    }
}
