//! The Persistence API consumed by the document store.
//!
//! Owner identity is implicit: an implementation is bound to one caller and the
//! remote side scopes every operation to documents that caller owns.

use std::time::Duration;

use async_trait::async_trait;
use resume_model::{
    ContentPatch, FieldError, ResumeContent, ResumeDocument, ResumeId, ResumeStats,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Resume not found")]
    NotFound,

    #[error("Resume belongs to another owner")]
    NotOwner,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid resume data ({} field(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Persistence unavailable: {0}")]
    Transient(String),

    #[error("Persistence call timed out after {0:?}")]
    Timeout(Duration),
}

impl PersistenceError {
    /// Not-owner and unauthenticated. Never retried automatically.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            PersistenceError::NotOwner | PersistenceError::Unauthenticated
        )
    }

    /// Network-level failures that a later attempt may clear.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PersistenceError::Transient(_) | PersistenceError::Timeout(_)
        )
    }

    pub fn validation_fields(&self) -> Option<&[FieldError]> {
        match self {
            PersistenceError::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PersistenceApi: Send + Sync {
    async fn create(&self, content: &ResumeContent) -> Result<ResumeDocument, PersistenceError>;

    async fn update(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
    ) -> Result<ResumeDocument, PersistenceError>;

    async fn get(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError>;

    /// Most recently updated first.
    async fn list(&self) -> Result<Vec<ResumeDocument>, PersistenceError>;

    async fn delete(&self, id: ResumeId) -> Result<(), PersistenceError>;

    async fn duplicate(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError>;

    /// Dashboard counters over the caller's documents.
    async fn stats(&self) -> Result<ResumeStats, PersistenceError>;
}
