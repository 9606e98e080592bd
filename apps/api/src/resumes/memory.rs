use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use resume_model::{ContentPatch, OwnerId, ResumeContent, ResumeDocument, ResumeId};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::resumes::{MergeCheck, ResumeRepository, StoredResume};

/// Process-local storage for tests and `STORAGE=memory`.
#[derive(Default)]
pub struct InMemoryResumeRepository {
    rows: RwLock<HashMap<ResumeId, StoredResume>>,
}

impl InMemoryResumeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeRepository for InMemoryResumeRepository {
    async fn insert(
        &self,
        owner: OwnerId,
        content: &ResumeContent,
        template: &str,
    ) -> Result<StoredResume, AppError> {
        let now = Utc::now();
        let stored = StoredResume {
            owner,
            document: ResumeDocument {
                id: ResumeId::new(),
                content: content.clone(),
                template: template.to_string(),
                created_at: now,
                updated_at: now,
            },
        };
        self.rows
            .write()
            .await
            .insert(stored.document.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: ResumeId) -> Result<Option<StoredResume>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<ResumeDocument>, AppError> {
        let rows = self.rows.read().await;
        let mut docs: Vec<ResumeDocument> = rows
            .values()
            .filter(|r| r.owner == owner)
            .map(|r| r.document.clone())
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }

    async fn merge_content(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
        check: MergeCheck<'_>,
    ) -> Result<Option<StoredResume>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        let merged = row.document.content.merged(patch);
        check(&*row, &merged)?;
        row.document.content = merged;
        // Strictly increasing even when two writes land in the same tick.
        let now = Utc::now();
        row.document.updated_at = if now > row.document.updated_at {
            now
        } else {
            row.document.updated_at + chrono::Duration::microseconds(1)
        };
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: ResumeId) -> Result<bool, AppError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}
