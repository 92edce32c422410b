//! Progress Record Store: one record per (student, unit) with upsert-by-key semantics.

#[cfg(test)]
mod memory;
mod postgres;
mod types;


use async_trait::async_trait;

use crate::db::models::ProgressRecord;

#[cfg(test)]
pub(crate) use memory::InMemoryProgressStore;
pub(crate) use postgres::PgProgressStore;
pub(crate) use types::{Page, ProgressFields, ProgressOrder, StoreError, Threshold, UnitKey};

#[async_trait]
pub(crate) trait ProgressStore: Send + Sync {
    /// Creates the record for `(student_id, unit)` or applies `fields` to the existing one.
    ///
    /// Only provided fields overwrite stored values. Stores backed by an accounts
    /// table register an unknown `student_id` in the same write. Fails with
    /// `StoreError::Validation` before touching storage when a field is out of range.
    async fn upsert(
        &self,
        student_id: &str,
        unit: &UnitKey,
        fields: &ProgressFields,
    ) -> Result<ProgressRecord, StoreError>;

    async fn get_by_unit(
        &self,
        student_id: &str,
        unit: &UnitKey,
    ) -> Result<Option<ProgressRecord>, StoreError>;

    /// Unordered unless `order` is given. A `page` without an order is taken
    /// in `ProgressOrder::Unit` order so windows are stable.
    async fn list_for_student(
        &self,
        student_id: &str,
        order: Option<ProgressOrder>,
        page: Option<Page>,
    ) -> Result<Vec<ProgressRecord>, StoreError>;

    /// Records flagged `struggling` OR with progress below `threshold`.
    async fn list_struggling(
        &self,
        student_id: &str,
        threshold: Threshold,
    ) -> Result<Vec<ProgressRecord>, StoreError>;
}
