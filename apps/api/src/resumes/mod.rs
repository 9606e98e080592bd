//! Resume persistence: storage backends behind `ResumeRepository`, the
//! ownership-checked operations built on it, and their HTTP handlers.

pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod service;

use async_trait::async_trait;
use resume_model::{ContentPatch, OwnerId, ResumeContent, ResumeDocument, ResumeId};

use crate::errors::AppError;

/// A stored resume together with its owner. The owner never leaves the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    pub owner: OwnerId,
    pub document: ResumeDocument,
}

/// Accepts or rejects a merged update before it is written. Gets the row as
/// stored and the content it would hold afterwards.
pub type MergeCheck<'a> =
    &'a (dyn Fn(&StoredResume, &ResumeContent) -> Result<(), AppError> + Send + Sync);

/// Raw storage. Does no ownership checks; see `service` for those.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn insert(
        &self,
        owner: OwnerId,
        content: &ResumeContent,
        template: &str,
    ) -> Result<StoredResume, AppError>;

    async fn find(&self, id: ResumeId) -> Result<Option<StoredResume>, AppError>;

    /// Most recently updated first.
    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<ResumeDocument>, AppError>;

    /// Merges `patch` into the stored content and bumps `updated_at`, holding
    /// the row from read to write so concurrent patches cannot drop fields.
    /// Nothing is written when `check` fails. `None` if the row is gone.
    async fn merge_content(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
        check: MergeCheck<'_>,
    ) -> Result<Option<StoredResume>, AppError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: ResumeId) -> Result<bool, AppError>;
}
