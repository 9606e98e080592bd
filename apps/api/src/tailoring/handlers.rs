//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use resume_model::tailoring::{CoverLetter, CoverLetterRequest, TailorRequest, TailoredResume};
use resume_model::validation::validate_job_description;

use crate::auth::CurrentOwner;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/tailor
///
/// Returns a tailored variant of the submitted resume. The stored resume is
/// not touched; saving the variant is a separate, explicit call.
pub async fn handle_tailor(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailoredResume>, AppError> {
    validate_job_description(&request.job())
        .map_err(|e| AppError::validation("Invalid job description", e))?;
    tracing::debug!(%owner, "Tailor request accepted");
    Ok(Json(state.tailor.tailor(&request).await?))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    validate_job_description(&request.job())
        .map_err(|e| AppError::validation("Invalid job description", e))?;
    tracing::debug!(%owner, tone = request.tone.as_str(), "Cover letter request accepted");
    Ok(Json(state.tailor.cover_letter(&request).await?))
}
