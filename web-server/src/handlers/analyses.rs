//! Analysis handlers - classify, persist, and read back a user's analyses

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use sleeprisk_core::build_features;

use crate::extract::JsonBody;
use crate::middleware::auth::UserContext;
use crate::models::{Analysis, AnalysisRequest, AnalysisResponse, NewAnalysis, ReportData};
use crate::{AppError, AppResult, AppState};

/// Build features, classify, and store the result
pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    JsonBody(req): JsonBody<AnalysisRequest>,
) -> AppResult<(StatusCode, Json<AnalysisResponse>)> {
    let user_id = user.require_user_id()?;

    let features = build_features(&req.input)?;
    let assessment = state.classifier.classify(&features)?;
    let model_id = state.classifier.status().model_id;

    let analysis = Analysis::record(
        &state.pool,
        NewAnalysis {
            user_id,
            email: &user.email,
            request: &req,
            features: features.as_slice(),
            class_index: assessment.class_index,
            disorder: assessment.disorder,
            model_id: model_id.as_deref(),
        },
    )
    .await?;

    tracing::info!(
        analysis = %analysis.id,
        class = assessment.class_index,
        latency_us = assessment.inference_time_us,
        "Analysis recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(AnalysisResponse {
            id: analysis.id,
            class_index: assessment.class_index,
            diagnosis: assessment.disorder.name,
            full_text: assessment.disorder.text,
            severity: assessment.disorder.severity,
            color: assessment.disorder.color,
            probabilities: assessment.probabilities,
            timestamp: analysis.created_at,
        }),
    ))
}

/// The caller's history, oldest first
pub async fn list(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<Vec<Analysis>>> {
    let user_id = user.require_user_id()?;
    let history = Analysis::history(&state.pool, user_id).await?;
    Ok(Json(history))
}

async fn find_owned(state: &AppState, user: &UserContext, id: Uuid) -> AppResult<Analysis> {
    let user_id = user.require_user_id()?;
    Analysis::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
}

pub async fn get(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Analysis>> {
    Ok(Json(find_owned(&state, &user, id).await?))
}

pub async fn report(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReportData>> {
    let analysis = find_owned(&state, &user, id).await?;
    Ok(Json(ReportData::from(&analysis)))
}
