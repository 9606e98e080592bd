//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use resume_model::{ContentPatch, ResumeContent, ResumeDocument, ResumeId, ResumeStats};

use crate::auth::CurrentOwner;
use crate::errors::AppError;
use crate::resumes::service;
use crate::state::AppState;

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(content): Json<ResumeContent>,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let doc = service::create(state.resumes.as_ref(), owner, &content).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Result<Json<Vec<ResumeDocument>>, AppError> {
    Ok(Json(service::list(state.resumes.as_ref(), owner).await?))
}

/// GET /api/v1/resumes/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Result<Json<ResumeStats>, AppError> {
    Ok(Json(service::stats(state.resumes.as_ref(), owner).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<ResumeId>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(service::get(state.resumes.as_ref(), owner, id).await?))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<ResumeId>,
    Json(patch): Json<ContentPatch>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(
        service::update(state.resumes.as_ref(), owner, id, &patch).await?,
    ))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<ResumeId>,
) -> Result<StatusCode, AppError> {
    service::delete(state.resumes.as_ref(), owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<ResumeId>,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let copy = service::duplicate(state.resumes.as_ref(), owner, id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}
