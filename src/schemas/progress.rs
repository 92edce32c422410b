use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::ProgressRecord;
use crate::repositories::progress::{ProgressFields, ProgressOrder};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressUpsertRequest {
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, message = "topic must not be empty"))]
    pub(crate) topic: String,
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = 100,
        message = "progress_percentage must be between 0 and 100"
    ))]
    pub(crate) progress_percentage: Option<i32>,
    /// Absent leaves the score alone; an explicit `null` clears it.
    /// Range is checked by the store.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub(crate) last_score: Option<Option<f64>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "attempts must be non-negative"))]
    pub(crate) attempts: Option<i32>,
    #[serde(default)]
    pub(crate) struggling: Option<bool>,
    #[serde(default)]
    pub(crate) completed: Option<bool>,
}

impl ProgressUpsertRequest {
    pub(crate) fn fields(&self) -> ProgressFields {
        ProgressFields {
            progress_percentage: self.progress_percentage,
            last_score: self.last_score,
            attempts: self.attempts,
            struggling: self.struggling,
            completed: self.completed,
        }
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub(crate) const fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressListQuery {
    #[serde(default)]
    pub(crate) order: Option<ProgressOrder>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnitQuery {
    pub(crate) subject: String,
    pub(crate) topic: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) module_name: String,
    pub(crate) progress_percentage: i32,
    pub(crate) last_score: Option<f64>,
    pub(crate) attempts: i32,
    pub(crate) struggling: bool,
    pub(crate) completed: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ProgressResponse {
    pub(crate) fn from_db(record: ProgressRecord) -> Self {
        Self {
            module_name: record.module_name(),
            id: record.id,
            student_id: record.student_id,
            subject: record.subject,
            topic: record.topic,
            progress_percentage: record.progress_percentage,
            last_score: record.last_score,
            attempts: record.attempts,
            struggling: record.struggling,
            completed: record.completed,
            created_at: format_primitive(record.created_at),
            updated_at: format_primitive(record.updated_at),
        }
    }
}
