//! Read-only view of the document store, published after every change.

use chrono::{DateTime, Utc};
use resume_model::{ResumeContent, ResumeDocument, ResumeId, ResumeStats};
use thiserror::Error;

use crate::persistence::PersistenceError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    SaveFailed(PersistenceError),
}

impl SaveStatus {
    pub fn is_saving(&self) -> bool {
        matches!(self, SaveStatus::Saving)
    }

    pub fn failure(&self) -> Option<&PersistenceError> {
        match self {
            SaveStatus::SaveFailed(e) => Some(e),
            _ => None,
        }
    }
}

/// Failures of non-save operations, surfaced as state rather than returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(ResumeId),

    #[error("Not authorized to access this resume")]
    Unauthorized,

    #[error("No resume data to save")]
    NothingToSave,

    #[error(transparent)]
    Persistence(PersistenceError),
}

impl StoreError {
    pub(crate) fn from_lookup(id: ResumeId, err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound => StoreError::NotFound(id),
            e if e.is_authorization() => StoreError::Unauthorized,
            e => StoreError::Persistence(e),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Last confirmed copy of the open document. `None` for an unsaved draft.
    pub current: Option<ResumeDocument>,
    /// Content as edited locally; may be ahead of `current`.
    pub pending: Option<ResumeContent>,
    pub save_status: SaveStatus,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub error: Option<StoreError>,
    pub is_loading: bool,
    /// The owner's documents, most recently updated first.
    pub resumes: Vec<ResumeDocument>,
    /// Counters from the last successful `refresh_stats()`.
    pub stats: Option<ResumeStats>,
    pub autosave_target: Option<ResumeId>,
}

impl StoreSnapshot {
    pub fn current_id(&self) -> Option<ResumeId> {
        self.current.as_ref().map(|d| d.id)
    }

    /// True when local content differs from the confirmed copy, or when an
    /// unsaved draft holds content at all.
    pub fn is_dirty(&self) -> bool {
        match (&self.current, &self.pending) {
            (Some(doc), Some(pending)) => doc.content != *pending,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(content: ResumeContent) -> ResumeDocument {
        ResumeDocument {
            id: ResumeId::new(),
            content,
            template: "classic".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dirty_compares_values() {
        let content = ResumeContent {
            summary: "A".to_string(),
            ..Default::default()
        };
        let mut snap = StoreSnapshot {
            current: Some(doc(content.clone())),
            pending: Some(content.clone()),
            ..Default::default()
        };
        assert!(!snap.is_dirty());

        snap.pending = Some(ResumeContent {
            summary: "B".to_string(),
            ..content
        });
        assert!(snap.is_dirty());
    }

    #[test]
    fn test_draft_is_dirty_and_empty_store_is_not() {
        let draft = StoreSnapshot {
            pending: Some(ResumeContent::default()),
            ..Default::default()
        };
        assert!(draft.is_dirty());
        assert!(!StoreSnapshot::default().is_dirty());
    }

    #[test]
    fn test_lookup_error_mapping() {
        let id = ResumeId::new();
        assert_eq!(
            StoreError::from_lookup(id, PersistenceError::NotFound),
            StoreError::NotFound(id)
        );
        assert_eq!(
            StoreError::from_lookup(id, PersistenceError::NotOwner),
            StoreError::Unauthorized
        );
        assert_eq!(
            StoreError::from_lookup(id, PersistenceError::Transient("x".into())),
            StoreError::Persistence(PersistenceError::Transient("x".into()))
        );
    }
}
