use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::repositories::progress::{Threshold, UnitKey};

/// One row per (student, subject, topic).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ProgressRecord {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) progress_percentage: i32,
    pub(crate) last_score: Option<f64>,
    pub(crate) attempts: i32,
    pub(crate) struggling: bool,
    pub(crate) completed: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl ProgressRecord {
    pub(crate) fn module_name(&self) -> String {
        UnitKey::display_name(&self.subject, &self.topic)
    }

    /// Flagged units always qualify; others only when progress is below the cutoff.
    pub(crate) fn needs_remediation(&self, threshold: Threshold) -> bool {
        self.struggling || self.progress_percentage < i32::from(threshold.value())
    }
}
