//! Ownership-checked resume operations. Handlers go through here; nothing
//! reads or writes a row before its owner has been compared.

use resume_model::{
    validate_content, ContentPatch, OwnerId, ResumeContent, ResumeDocument, ResumeId, ResumeStats,
    DEFAULT_TEMPLATE,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resumes::{ResumeRepository, StoredResume};

fn not_found(id: ResumeId) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

fn check_owner(stored: &StoredResume, owner: OwnerId) -> Result<(), AppError> {
    if stored.owner != owner {
        warn!(id = %stored.document.id, %owner, "Rejected access to another owner's resume");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn owned(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    id: ResumeId,
) -> Result<StoredResume, AppError> {
    let stored = repo.find(id).await?.ok_or_else(|| not_found(id))?;
    check_owner(&stored, owner)?;
    Ok(stored)
}

pub async fn create(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    content: &ResumeContent,
) -> Result<ResumeDocument, AppError> {
    validate_content(content).map_err(|e| AppError::validation("Invalid resume data", e))?;
    let stored = repo.insert(owner, content, DEFAULT_TEMPLATE).await?;
    info!(id = %stored.document.id, %owner, "Resume created");
    Ok(stored.document)
}

pub async fn get(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    id: ResumeId,
) -> Result<ResumeDocument, AppError> {
    Ok(owned(repo, owner, id).await?.document)
}

pub async fn list(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
) -> Result<Vec<ResumeDocument>, AppError> {
    repo.list_for_owner(owner).await
}

/// Merges `patch` into the stored content and validates the merged result,
/// so a partial update can never leave an incomplete resume behind. Owner
/// check, merge and write happen while the repository holds the row.
pub async fn update(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    id: ResumeId,
    patch: &ContentPatch,
) -> Result<ResumeDocument, AppError> {
    let check = |stored: &StoredResume, merged: &ResumeContent| -> Result<(), AppError> {
        check_owner(stored, owner)?;
        validate_content(merged).map_err(|e| AppError::validation("Invalid resume data", e))
    };
    let updated = repo
        .merge_content(id, patch, &check)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(%id, "Resume updated");
    Ok(updated.document)
}

pub async fn delete(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    id: ResumeId,
) -> Result<(), AppError> {
    owned(repo, owner, id).await?;
    if !repo.delete(id).await? {
        return Err(not_found(id));
    }
    info!(%id, "Resume deleted");
    Ok(())
}

/// Copies content and template under a fresh id. The copy is not validated
/// again; a stored resume already passed.
pub async fn duplicate(
    repo: &dyn ResumeRepository,
    owner: OwnerId,
    id: ResumeId,
) -> Result<ResumeDocument, AppError> {
    let source = owned(repo, owner, id).await?;
    let copy = repo
        .insert(owner, &source.document.content, &source.document.template)
        .await?;
    info!(source = %id, copy = %copy.document.id, "Resume duplicated");
    Ok(copy.document)
}

pub async fn stats(repo: &dyn ResumeRepository, owner: OwnerId) -> Result<ResumeStats, AppError> {
    let docs = repo.list_for_owner(owner).await?;
    Ok(ResumeStats {
        total_resumes: docs.len() as u64,
        recent_activity: docs.iter().map(|d| d.updated_at).max(),
    })
}
