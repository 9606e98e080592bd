use async_trait::async_trait;
use chrono::{DateTime, Utc};
use resume_model::{ContentPatch, OwnerId, ResumeContent, ResumeDocument, ResumeId};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::{MergeCheck, ResumeRepository, StoredResume};

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    user_id: Uuid,
    data: Json<ResumeContent>,
    template: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for StoredResume {
    fn from(row: ResumeRow) -> Self {
        StoredResume {
            owner: OwnerId(row.user_id),
            document: ResumeDocument {
                id: ResumeId(row.id),
                content: row.data.0,
                template: row.template,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const COLUMNS: &str = "id, user_id, data, template, created_at, updated_at";

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn insert(
        &self,
        owner: OwnerId,
        content: &ResumeContent,
        template: &str,
    ) -> Result<StoredResume, AppError> {
        let row: ResumeRow = sqlx::query_as(&format!(
            "INSERT INTO resumes (id, user_id, data, template) VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner.0)
        .bind(Json(content))
        .bind(template)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find(&self, id: ResumeId) -> Result<Option<StoredResume>, AppError> {
        let row: Option<ResumeRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM resumes WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<ResumeDocument>, AppError> {
        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| StoredResume::from(r).document)
            .collect())
    }

    async fn merge_content(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
        check: MergeCheck<'_>,
    ) -> Result<Option<StoredResume>, AppError> {
        // The row stays locked until commit; dropping `tx` rolls back.
        let mut tx = self.pool.begin().await?;
        let current: Option<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM resumes WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current.map(StoredResume::from) else {
            return Ok(None);
        };

        let merged = current.document.content.merged(patch);
        check(&current, &merged)?;

        // updated_at strictly increases with every write.
        let row: ResumeRow = sqlx::query_as(&format!(
            "UPDATE resumes \
             SET data = $2, updated_at = GREATEST(now(), updated_at + interval '1 microsecond') \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.0)
        .bind(Json(&merged))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: ResumeId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
