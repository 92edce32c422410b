use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::state::AppState;
use crate::schemas::progress::{
    ProgressListQuery, ProgressResponse, ProgressUpsertRequest, UnitQuery,
};
use crate::schemas::tutor::{ListEnvelope, ThresholdQuery};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).put(upsert_progress))
        .route("/unit", get(get_unit_progress))
        .route("/struggling", get(list_struggling))
}

async fn list_progress(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ProgressListQuery>,
) -> Result<Json<ListEnvelope<ProgressResponse>>, ApiError> {
    let page = validation::page(params.skip, params.limit)?;

    let records = state
        .progress()
        .list_for_student(&user.id, params.order, Some(page))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list progress"))?;

    Ok(Json(records.into_iter().map(ProgressResponse::from_db).collect::<Vec<_>>().into()))
}

pub(crate) async fn save_progress(
    state: &AppState,
    student_id: &str,
    payload: &ProgressUpsertRequest,
) -> Result<ProgressResponse, ApiError> {
    payload.validate()?;
    let unit = validation::unit_key(&payload.subject, &payload.topic)?;

    let record = state
        .progress()
        .upsert(student_id, &unit, &payload.fields())
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to save progress"))?;

    tracing::info!(
        student_id,
        subject = %record.subject,
        topic = %record.topic,
        progress = record.progress_percentage,
        struggling = record.struggling,
        "Progress saved"
    );

    Ok(ProgressResponse::from_db(record))
}

async fn upsert_progress(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProgressUpsertRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    save_progress(&state, &user.id, &payload).await.map(Json)
}

async fn get_unit_progress(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<UnitQuery>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let unit = validation::unit_key(&params.subject, &params.topic)?;

    let record = state
        .progress()
        .get_by_unit(&user.id, &unit)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to load progress"))?
        .ok_or_else(|| ApiError::NotFound(format!("No progress recorded for {}", unit.name())))?;

    Ok(Json(ProgressResponse::from_db(record)))
}

async fn list_struggling(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ThresholdQuery>,
) -> Result<Json<ListEnvelope<ProgressResponse>>, ApiError> {
    let threshold = validation::threshold_or_default(
        params.threshold,
        state.settings().tutor().default_threshold,
    )?;

    let records = state
        .progress()
        .list_struggling(&user.id, threshold)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list struggling units"))?;

    Ok(Json(records.into_iter().map(ProgressResponse::from_db).collect::<Vec<_>>().into()))
}
