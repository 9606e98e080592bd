use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::ResumeContent;

pub const DEFAULT_TEMPLATE: &str = "classic";

/// Identifier of a durably created resume. Assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(pub Uuid);

impl ResumeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResumeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ResumeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The owning principal. Only the persistence side ever reads or compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A persisted resume as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub id: ResumeId,
    pub content: ResumeContent,
    pub template: String,
    pub created_at: DateTime<Utc>,
    /// Advanced only by a confirmed write.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStats {
    pub total_resumes: u64,
    pub recent_activity: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_id_serializes_as_bare_uuid() {
        let id = ResumeId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_resume_id_parses_from_display() {
        let id = ResumeId::new();
        assert_eq!(id.to_string().parse::<ResumeId>().unwrap(), id);
        assert!("not-a-uuid".parse::<ResumeId>().is_err());
    }

    #[test]
    fn test_document_wire_shape_has_no_owner() {
        let doc = ResumeDocument {
            id: ResumeId::new(),
            content: ResumeContent::default(),
            template: DEFAULT_TEMPLATE.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("ownerId").is_none());
        assert!(json.get("userId").is_none());
    }
}
