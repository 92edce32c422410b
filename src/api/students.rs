use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::progress::save_progress;
use crate::api::validation;
use crate::core::state::AppState;
use crate::schemas::progress::{ProgressListQuery, ProgressResponse, ProgressUpsertRequest};
use crate::schemas::tutor::{ListEnvelope, RecommendationsResponse, ThresholdQuery};
use crate::services::remediation::RemediationPolicy;
use crate::services::tutor;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:student_id/progress", get(list_student_progress).put(override_student_progress))
        .route("/:student_id/remediation", get(student_remediation))
}

async fn list_student_progress(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(student_id): Path<String>,
    Query(params): Query<ProgressListQuery>,
) -> Result<Json<ListEnvelope<ProgressResponse>>, ApiError> {
    let student_id = validation::student_id(&student_id)?;
    let page = validation::page(params.skip, params.limit)?;

    let records = state
        .progress()
        .list_for_student(student_id, params.order, Some(page))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list progress"))?;

    Ok(Json(records.into_iter().map(ProgressResponse::from_db).collect::<Vec<_>>().into()))
}

/// Staff override, typically to raise or clear the struggling flag.
async fn override_student_progress(
    State(state): State<AppState>,
    CurrentStaff(staff): CurrentStaff,
    Path(student_id): Path<String>,
    Json(payload): Json<ProgressUpsertRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let student_id = validation::student_id(&student_id)?;

    let response = save_progress(&state, student_id, &payload).await?;
    tracing::info!(
        staff_id = %staff.id,
        staff_role = ?staff.role,
        student_id,
        module = %response.module_name,
        "Progress overridden by staff"
    );

    Ok(Json(response))
}

async fn student_remediation(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(student_id): Path<String>,
    Query(params): Query<ThresholdQuery>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let student_id = validation::student_id(&student_id)?;
    let default = state.settings().tutor().default_threshold;
    let threshold = validation::threshold_or_default(params.threshold, default)?;
    let policy = RemediationPolicy::ThresholdBands { threshold };

    let recommendations = tutor::recommend_for_student(state.progress(), student_id, policy)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to compute remediation"))?;

    Ok(Json(RecommendationsResponse::from_recommendations(recommendations, false)))
}
