use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::ProgressRecord;

use super::types::{
    Page, ProgressFields, ProgressOrder, StoreError, Threshold, UnitKey, COLUMNS,
};
use super::ProgressStore;

#[derive(Clone)]
pub(crate) struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn upsert(
        &self,
        student_id: &str,
        unit: &UnitKey,
        fields: &ProgressFields,
    ) -> Result<ProgressRecord, StoreError> {
        fields.validate()?;
        let now = primitive_now_utc();
        let mut tx = self.pool.begin().await?;

        // Student ids come from provider tokens; the first write registers the account row.
        sqlx::query(
            "INSERT INTO users (id, role, is_active, created_at, updated_at)
             VALUES ($1, 'student', TRUE, $2, $2)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(student_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // The (student_id, subject, topic) unique constraint arbitrates
        // concurrent writers for the same key.
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            "INSERT INTO student_progress (
                id, student_id, subject, topic, progress_percentage, last_score,
                attempts, struggling, completed, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, COALESCE($5, 0), $6,
                COALESCE($7, 0), COALESCE($8, FALSE), COALESCE($9, FALSE), $10, $10
            )
            ON CONFLICT (student_id, subject, topic) DO UPDATE SET
                progress_percentage = COALESCE($5, student_progress.progress_percentage),
                last_score = CASE WHEN $11 THEN $6 ELSE student_progress.last_score END,
                attempts = COALESCE($7, student_progress.attempts),
                struggling = COALESCE($8, student_progress.struggling),
                completed = COALESCE($9, student_progress.completed),
                updated_at = $10
            RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(student_id)
        .bind(&unit.subject)
        .bind(&unit.topic)
        .bind(fields.progress_percentage)
        .bind(fields.last_score.flatten())
        .bind(fields.attempts)
        .bind(fields.struggling)
        .bind(fields.completed)
        .bind(now)
        .bind(fields.last_score.is_some())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn get_by_unit(
        &self,
        student_id: &str,
        unit: &UnitKey,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            "SELECT {COLUMNS} FROM student_progress
             WHERE student_id = $1 AND subject = $2 AND topic = $3"
        ))
        .bind(student_id)
        .bind(&unit.subject)
        .bind(&unit.topic)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_for_student(
        &self,
        student_id: &str,
        order: Option<ProgressOrder>,
        page: Option<Page>,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let order = if page.is_some() { order.or(Some(ProgressOrder::Unit)) } else { order };
        let order_clause = order.map(ProgressOrder::sql).unwrap_or_default();
        let page_clause = if page.is_some() { " LIMIT $2 OFFSET $3" } else { "" };

        let sql = format!(
            "SELECT {COLUMNS} FROM student_progress \
             WHERE student_id = $1{order_clause}{page_clause}"
        );

        let mut query = sqlx::query_as::<_, ProgressRecord>(&sql).bind(student_id);
        if let Some(page) = page {
            query = query.bind(page.limit()).bind(page.skip());
        }
        let records = query.fetch_all(&self.pool).await?;

        Ok(records)
    }

    async fn list_struggling(
        &self,
        student_id: &str,
        threshold: Threshold,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let records = sqlx::query_as::<_, ProgressRecord>(&format!(
            "SELECT {COLUMNS} FROM student_progress
             WHERE student_id = $1
               AND (struggling OR progress_percentage < $2)"
        ))
        .bind(student_id)
        .bind(i32::from(threshold.value()))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
