//! Resume content: the structured value edited by the builder and the editor.
//!
//! Every field defaults to its empty value so a half-finished draft round-trips
//! through storage. Completeness is a validation concern, see `validation`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    /// Free-text date range, e.g. "Jan 2020 - Present".
    pub dates: String,
    pub location: String,
    /// Achievement bullets in display order.
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub dates: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeContent {
    pub contact_info: ContactInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

/// A field-scoped update. `None` means the field is not part of the update;
/// `Some` replaces the prior value wholesale (sequences are never appended to).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

impl ContentPatch {
    /// A patch that sets every field to the values in `content`.
    pub fn full(content: &ResumeContent) -> Self {
        Self {
            contact_info: Some(content.contact_info.clone()),
            summary: Some(content.summary.clone()),
            experience: Some(content.experience.clone()),
            education: Some(content.education.clone()),
            skills: Some(content.skills.clone()),
        }
    }

    pub fn with_contact_info(mut self, contact_info: ContactInfo) -> Self {
        self.contact_info = Some(contact_info);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_experience(mut self, experience: Vec<ExperienceEntry>) -> Self {
        self.experience = Some(experience);
        self
    }

    pub fn with_education(mut self, education: Vec<EducationEntry>) -> Self {
        self.education = Some(education);
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = Some(skills.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contact_info.is_none()
            && self.summary.is_none()
            && self.experience.is_none()
            && self.education.is_none()
            && self.skills.is_none()
    }
}

impl ResumeContent {
    /// Shallow top-level merge. Returns a new value; `self` is left untouched.
    pub fn merged(&self, patch: &ContentPatch) -> ResumeContent {
        ResumeContent {
            contact_info: patch
                .contact_info
                .clone()
                .unwrap_or_else(|| self.contact_info.clone()),
            summary: patch.summary.clone().unwrap_or_else(|| self.summary.clone()),
            experience: patch
                .experience
                .clone()
                .unwrap_or_else(|| self.experience.clone()),
            education: patch
                .education
                .clone()
                .unwrap_or_else(|| self.education.clone()),
            skills: patch.skills.clone().unwrap_or_else(|| self.skills.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResumeContent {
        ResumeContent {
            contact_info: ContactInfo {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-010-0199".to_string(),
                location: "London".to_string(),
            },
            summary: "A".to_string(),
            experience: vec![ExperienceEntry {
                title: "Analyst".to_string(),
                company: "Engines Ltd".to_string(),
                dates: "1842 - 1843".to_string(),
                location: "London".to_string(),
                bullets: vec!["Wrote the first published algorithm".to_string()],
            }],
            education: vec![],
            skills: vec!["x".to_string()],
        }
    }

    #[test]
    fn test_merge_replaces_only_included_field() {
        let base = sample();
        let merged = base.merged(&ContentPatch::default().with_skills(["x", "y"]));

        assert_eq!(merged.skills, vec!["x", "y"]);
        assert_eq!(merged.summary, base.summary);
        assert_eq!(merged.contact_info, base.contact_info);
        assert_eq!(merged.experience, base.experience);
        assert_eq!(merged.education, base.education);
    }

    #[test]
    fn test_merge_replaces_sequences_wholesale() {
        let base = sample();
        let merged = base.merged(&ContentPatch::default().with_experience(vec![]));
        assert!(merged.experience.is_empty());

        let merged = base.merged(&ContentPatch::default().with_skills(["z"]));
        assert_eq!(merged.skills, vec!["z"]);
    }

    #[test]
    fn test_merge_does_not_mutate_input() {
        let base = sample();
        let before = base.clone();
        let _ = base.merged(&ContentPatch::full(&ResumeContent::default()));
        assert_eq!(base, before);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let base = sample();
        let patch = ContentPatch::default();
        assert!(patch.is_empty());
        assert_eq!(base.merged(&patch), base);
    }

    #[test]
    fn test_full_patch_reproduces_content() {
        let target = sample();
        assert_eq!(
            ResumeContent::default().merged(&ContentPatch::full(&target)),
            target
        );
    }

    #[test]
    fn test_content_uses_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("contactInfo").is_some());
        assert!(json.get("contact_info").is_none());
    }

    #[test]
    fn test_partial_draft_deserializes_with_defaults() {
        let content: ResumeContent = serde_json::from_str(r#"{"summary": "Draft"}"#).unwrap();
        assert_eq!(content.summary, "Draft");
        assert!(content.skills.is_empty());
        assert_eq!(content.contact_info, ContactInfo::default());
    }

    #[test]
    fn test_patch_omits_absent_fields_on_the_wire() {
        let json = serde_json::to_value(ContentPatch::default().with_summary("S")).unwrap();
        assert_eq!(json, serde_json::json!({ "summary": "S" }));
    }
}
