use crate::api::errors::ApiError;
use crate::repositories::progress::{Page, Threshold, UnitKey};

pub(crate) fn threshold_or_default(raw: Option<i64>, default: u8) -> Result<Threshold, ApiError> {
    let value = raw.unwrap_or(i64::from(default));
    Threshold::new(value).map_err(|err| ApiError::from_store(err, "Invalid threshold"))
}

pub(crate) fn unit_key(subject: &str, topic: &str) -> Result<UnitKey, ApiError> {
    UnitKey::new(subject, topic).map_err(|err| ApiError::from_store(err, "Invalid unit"))
}

pub(crate) fn page(skip: i64, limit: i64) -> Result<Page, ApiError> {
    Page::new(skip, limit).map_err(|err| ApiError::from_store(err, "Invalid page"))
}

pub(crate) fn student_id(raw: &str) -> Result<&str, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest("Student id must not be empty".to_string()))
    } else {
        Ok(trimmed)
    }
}
