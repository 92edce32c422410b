use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::ProgressRecord;

use super::types::{Page, ProgressFields, ProgressOrder, StoreError, Threshold, UnitKey};
use super::ProgressStore;

type RecordKey = (String, UnitKey);

/// Process-local store for tests; the lock covers the whole lookup-then-write.
#[derive(Default)]
pub(crate) struct InMemoryProgressStore {
    records: Mutex<BTreeMap<RecordKey, ProgressRecord>>,
}

impl InMemoryProgressStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<RecordKey, ProgressRecord>>, StoreError> {
        self.records.lock().map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn student_records(
        guard: &BTreeMap<RecordKey, ProgressRecord>,
        student_id: &str,
    ) -> Vec<ProgressRecord> {
        guard
            .iter()
            .filter(|((owner, _), _)| owner == student_id)
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn upsert(
        &self,
        student_id: &str,
        unit: &UnitKey,
        fields: &ProgressFields,
    ) -> Result<ProgressRecord, StoreError> {
        fields.validate()?;
        let now = primitive_now_utc();
        let mut guard = self.lock()?;

        let record = guard.entry((student_id.to_string(), unit.clone())).or_insert_with(|| {
            ProgressRecord {
                id: Uuid::new_v4().to_string(),
                student_id: student_id.to_string(),
                subject: unit.subject.clone(),
                topic: unit.topic.clone(),
                progress_percentage: 0,
                last_score: None,
                attempts: 0,
                struggling: false,
                completed: false,
                created_at: now,
                updated_at: now,
            }
        });

        if let Some(value) = fields.progress_percentage {
            record.progress_percentage = value;
        }
        if let Some(value) = fields.last_score {
            record.last_score = value;
        }
        if let Some(value) = fields.attempts {
            record.attempts = value;
        }
        if let Some(value) = fields.struggling {
            record.struggling = value;
        }
        if let Some(value) = fields.completed {
            record.completed = value;
        }
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn get_by_unit(
        &self,
        student_id: &str,
        unit: &UnitKey,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(&(student_id.to_string(), unit.clone())).cloned())
    }

    async fn list_for_student(
        &self,
        student_id: &str,
        order: Option<ProgressOrder>,
        page: Option<Page>,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let guard = self.lock()?;
        let mut records = Self::student_records(&guard, student_id);
        let order = if page.is_some() { order.or(Some(ProgressOrder::Unit)) } else { order };
        if let Some(order) = order {
            records.sort_by(|left, right| order.compare(left, right));
        }
        if let Some(page) = page {
            records = records
                .into_iter()
                .skip(usize::try_from(page.skip()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .collect();
        }
        Ok(records)
    }

    async fn list_struggling(
        &self,
        student_id: &str,
        threshold: Threshold,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let guard = self.lock()?;
        let mut records = Self::student_records(&guard, student_id);
        records.retain(|record| record.needs_remediation(threshold));
        Ok(records)
    }
}
