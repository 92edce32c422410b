//! Load, aggregate and recommend for one student.

use crate::core::metrics;
use crate::repositories::progress::{ProgressStore, StoreError};
use crate::services::progress_analysis::{self, ProgressSummary};
use crate::services::remediation::{self, Recommendations, RemediationPolicy};

/// Band rules read only the struggling candidates; the study plan reads
/// the student's full record set.
pub(crate) async fn recommend_for_student(
    store: &dyn ProgressStore,
    student_id: &str,
    policy: RemediationPolicy<'_>,
) -> Result<Recommendations, StoreError> {
    let records = match policy {
        RemediationPolicy::ThresholdBands { threshold } => {
            store.list_struggling(student_id, threshold).await?
        }
        RemediationPolicy::WeakAreas { .. } => {
            store.list_for_student(student_id, None, None).await?
        }
    };

    let recommendations = remediation::recommend(policy, &records);
    let items = recommendations.item_count();

    metrics::record_recommendations(policy.label(), items);
    tracing::info!(
        student_id,
        policy = policy.label(),
        candidates = records.len(),
        items,
        "Computed recommendations"
    );
    Ok(recommendations)
}

pub(crate) async fn summary_for_student(
    store: &dyn ProgressStore,
    student_id: &str,
) -> Result<ProgressSummary, StoreError> {
    let records = store.list_for_student(student_id, None, None).await?;
    Ok(progress_analysis::analyze(&records))
}
