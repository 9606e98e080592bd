//! Wire types for the tailoring and cover-letter calls.
//!
//! These cross the Tailoring Service boundary only. A tailored result is a
//! derived variant and never replaces the stored resume by itself.

use serde::{Deserialize, Serialize};

use crate::content::{ExperienceEntry, ResumeContent};

pub const MAX_MATCH_SCORE: u32 = 100;
pub const COVER_LETTER_MIN_CHARS: usize = 250;
pub const COVER_LETTER_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobDescription {
    pub description: String,
    pub company_name: Option<String>,
    pub role_title: Option<String>,
    pub employer_website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume: ResumeContent,
    pub job_description: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
}

impl TailorRequest {
    pub fn job(&self) -> JobDescription {
        JobDescription {
            description: self.job_description.clone(),
            company_name: self.company_name.clone(),
            role_title: self.role_title.clone(),
            employer_website: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResume {
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    /// 0 – 100
    pub match_score: f64,
    #[serde(default)]
    pub key_changes: Vec<String>,
    #[serde(default)]
    pub ats_keywords: Vec<String>,
}

impl TailoredResume {
    pub fn is_valid(&self) -> bool {
        self.match_score.is_finite()
            && self.match_score >= 0.0
            && self.match_score <= MAX_MATCH_SCORE as f64
    }

    /// Applies the tailored sections onto `base`; contact info and education
    /// are kept from the original.
    pub fn apply_to(&self, base: &ResumeContent) -> ResumeContent {
        ResumeContent {
            contact_info: base.contact_info.clone(),
            summary: self.summary.clone(),
            experience: self.experience.clone(),
            education: base.education.clone(),
            skills: self.skills.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Concise,
}

impl CoverLetterTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverLetterTone::Professional => "professional",
            CoverLetterTone::Enthusiastic => "enthusiastic",
            CoverLetterTone::Concise => "concise",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub resume: ResumeContent,
    pub job_description: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub tone: CoverLetterTone,
}

impl CoverLetterRequest {
    pub fn job(&self) -> JobDescription {
        JobDescription {
            description: self.job_description.clone(),
            company_name: self.company_name.clone(),
            role_title: self.role_title.clone(),
            employer_website: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub cover_letter: String,
    pub tone: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl CoverLetter {
    pub fn is_valid(&self) -> bool {
        let len = self.cover_letter.chars().count();
        (COVER_LETTER_MIN_CHARS..=COVER_LETTER_MAX_CHARS).contains(&len)
    }
}
