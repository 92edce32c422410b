use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
use crate::db::models::ProgressRecord;

pub(crate) const COLUMNS: &str = "\
    id, student_id, subject, topic, progress_percentage, last_score, attempts, \
    struggling, completed, created_at, updated_at";

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("progress store unavailable: {0}")]
    Unavailable(String),
}

/// Canonical identifier of a learning unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub(crate) struct UnitKey {
    pub(crate) subject: String,
    pub(crate) topic: String,
}

impl UnitKey {
    pub(crate) fn new(subject: &str, topic: &str) -> Result<Self, StoreError> {
        let subject = subject.trim();
        let topic = topic.trim();
        if subject.is_empty() {
            return Err(StoreError::Validation {
                field: "subject",
                message: "must not be empty".to_string(),
            });
        }
        if topic.is_empty() {
            return Err(StoreError::Validation {
                field: "topic",
                message: "must not be empty".to_string(),
            });
        }

        Ok(Self { subject: subject.to_string(), topic: topic.to_string() })
    }

    pub(crate) fn display_name(subject: &str, topic: &str) -> String {
        format!("{subject}: {topic}")
    }

    pub(crate) fn name(&self) -> String {
        Self::display_name(&self.subject, &self.topic)
    }
}

/// Progress cutoff in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Threshold(u8);

impl Threshold {
    pub(crate) fn new(value: i64) -> Result<Self, StoreError> {
        match u8::try_from(value) {
            Ok(parsed) if parsed <= 100 => Ok(Self(parsed)),
            _ => Err(StoreError::InvalidArgument(format!(
                "threshold must be between 0 and 100, got {value}"
            ))),
        }
    }

    pub(crate) fn value(self) -> u8 {
        self.0
    }
}

pub(crate) const MAX_PAGE_LIMIT: i64 = 500;

/// Offset window over a student's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    skip: i64,
    limit: i64,
}

impl Page {
    pub(crate) fn new(skip: i64, limit: i64) -> Result<Self, StoreError> {
        if skip < 0 {
            return Err(StoreError::InvalidArgument(format!(
                "skip must not be negative, got {skip}"
            )));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(StoreError::InvalidArgument(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        Ok(Self { skip, limit })
    }

    pub(crate) fn skip(self) -> i64 {
        self.skip
    }

    pub(crate) fn limit(self) -> i64 {
        self.limit
    }
}

/// Fields a caller may set on upsert. `None` leaves the stored value untouched
/// (or falls back to the column default on create).
///
/// `last_score` is tri-state: `Some(None)` clears the score back to "never assessed".
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ProgressFields {
    pub(crate) progress_percentage: Option<i32>,
    pub(crate) last_score: Option<Option<f64>>,
    pub(crate) attempts: Option<i32>,
    pub(crate) struggling: Option<bool>,
    pub(crate) completed: Option<bool>,
}

impl ProgressFields {
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if let Some(value) = self.progress_percentage {
            if !(0..=100).contains(&value) {
                return Err(StoreError::Validation {
                    field: "progress_percentage",
                    message: format!("must be between 0 and 100, got {value}"),
                });
            }
        }

        if let Some(Some(value)) = self.last_score {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(StoreError::Validation {
                    field: "last_score",
                    message: format!("must be between 0 and 100, got {value}"),
                });
            }
        }

        if let Some(value) = self.attempts {
            if value < 0 {
                return Err(StoreError::Validation {
                    field: "attempts",
                    message: format!("must not be negative, got {value}"),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ProgressOrder {
    UpdatedDesc,
    ProgressAsc,
    Unit,
}

impl ProgressOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::UpdatedDesc => " ORDER BY updated_at DESC, subject, topic",
            Self::ProgressAsc => " ORDER BY progress_percentage ASC, subject, topic",
            Self::Unit => " ORDER BY subject, topic",
        }
    }

    /// In-process equivalent of [`ProgressOrder::sql`].
    #[cfg(test)]
    pub(crate) fn compare(
        self,
        left: &ProgressRecord,
        right: &ProgressRecord,
    ) -> std::cmp::Ordering {
        let by_unit = || (&left.subject, &left.topic).cmp(&(&right.subject, &right.topic));
        match self {
            Self::UpdatedDesc => right.updated_at.cmp(&left.updated_at).then_with(by_unit),
            Self::ProgressAsc => {
                left.progress_percentage.cmp(&right.progress_percentage).then_with(by_unit)
            }
            Self::Unit => by_unit(),
        }
    }
}
