//! reqwest-backed `PersistenceApi` talking to the resume API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use resume_model::api_error::ErrorBody;
use resume_model::{
    ContentPatch, OwnerId, ResumeContent, ResumeDocument, ResumeId, ResumeStats,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::persistence::{PersistenceApi, PersistenceError};

/// Header carrying the caller's identity, issued upstream by the auth layer.
pub const OWNER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct HttpPersistence {
    client: Client,
    base_url: String,
    owner: OwnerId,
    timeout: Duration,
}

impl HttpPersistence {
    pub fn new(base_url: impl Into<String>, owner: OwnerId, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            owner,
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/resumes{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PersistenceError> {
        let response = request
            .header(OWNER_HEADER, self.owner.to_string())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Resume API returned {status}: {body}");
        Err(error_from_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PersistenceError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> PersistenceError {
        if e.is_timeout() {
            PersistenceError::Timeout(self.timeout)
        } else {
            PersistenceError::Transient(e.to_string())
        }
    }
}

/// Maps a non-success status and its error envelope onto `PersistenceError`.
fn error_from_status(status: StatusCode, body: &str) -> PersistenceError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    match status {
        StatusCode::NOT_FOUND => PersistenceError::NotFound,
        StatusCode::FORBIDDEN => PersistenceError::NotOwner,
        StatusCode::UNAUTHORIZED => PersistenceError::Unauthenticated,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PersistenceError::Validation(parsed.map(|b| b.error.fields).unwrap_or_default())
        }
        _ => PersistenceError::Transient(
            parsed
                .map(|b| b.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        ),
    }
}

#[async_trait]
impl PersistenceApi for HttpPersistence {
    async fn create(&self, content: &ResumeContent) -> Result<ResumeDocument, PersistenceError> {
        self.send_json(self.client.post(self.url("")).json(content))
            .await
    }

    async fn update(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
    ) -> Result<ResumeDocument, PersistenceError> {
        self.send_json(self.client.patch(self.url(&format!("/{id}"))).json(patch))
            .await
    }

    async fn get(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError> {
        self.send_json(self.client.get(self.url(&format!("/{id}"))))
            .await
    }

    async fn list(&self) -> Result<Vec<ResumeDocument>, PersistenceError> {
        self.send_json(self.client.get(self.url(""))).await
    }

    async fn delete(&self, id: ResumeId) -> Result<(), PersistenceError> {
        self.send(self.client.delete(self.url(&format!("/{id}"))))
            .await
            .map(|_| ())
    }

    async fn duplicate(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError> {
        self.send_json(self.client.post(self.url(&format!("/{id}/duplicate"))))
            .await
    }

    async fn stats(&self) -> Result<ResumeStats, PersistenceError> {
        self.send_json(self.client.get(self.url("/stats"))).await
    }
}
