use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::state::AppState;
use crate::schemas::tutor::{RecommendationsResponse, StudyPlanQuery, ThresholdQuery};
use crate::services::progress_analysis::ProgressSummary;
use crate::services::remediation::RemediationPolicy;
use crate::services::tutor;

/// Threshold-band remediation for the caller.
pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/recommendations", get(recommendations))
}

/// Weak-area analysis and study plan for the caller.
pub(crate) fn virtual_tutor_router() -> Router<AppState> {
    Router::new()
        .route("/analysis", get(analysis))
        .route("/recommendations", get(study_plan))
}

async fn recommendations(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ThresholdQuery>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let default = state.settings().tutor().default_threshold;
    let threshold = validation::threshold_or_default(params.threshold, default)?;
    let policy = RemediationPolicy::ThresholdBands { threshold };

    let recommendations = tutor::recommend_for_student(state.progress(), &user.id, policy)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to compute recommendations"))?;

    Ok(Json(RecommendationsResponse::from_recommendations(recommendations, false)))
}

async fn analysis(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProgressSummary>, ApiError> {
    tutor::summary_for_student(state.progress(), &user.id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, "Failed to analyze progress"))
}

async fn study_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<StudyPlanQuery>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let policy = RemediationPolicy::WeakAreas {
        simulation_base_path: &state.settings().tutor().simulation_base_path,
    };

    let recommendations = tutor::recommend_for_student(state.progress(), &user.id, policy)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to build study plan"))?;

    Ok(Json(RecommendationsResponse::from_recommendations(recommendations, params.compact)))
}
