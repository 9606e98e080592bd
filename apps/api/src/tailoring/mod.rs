//! Tailoring Service: derives a job-specific resume variant or a cover letter
//! from stored content. Results are returned to the caller, never persisted.

pub mod handlers;
pub mod jd_metadata;
pub mod prompts;

use async_trait::async_trait;
use resume_model::tailoring::{CoverLetter, CoverLetterRequest, TailorRequest, TailoredResume};
use resume_model::ResumeContent;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::LlmClient;

const TAILOR_MAX_TOKENS: u32 = 4096;
const COVER_LETTER_MAX_TOKENS: u32 = 2048;

/// Everything a prompt needs, with blanks already filled from the description.
#[derive(Debug, Clone, Copy)]
pub struct TailoringContext<'a> {
    pub resume: &'a ResumeContent,
    pub job_description: &'a str,
    pub company_name: Option<&'a str>,
    pub role_title: Option<&'a str>,
    pub keywords: &'a [String],
}

/// Inputs after job metadata inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub company_name: Option<String>,
    pub role_title: Option<String>,
    pub keywords: Vec<String>,
}

impl JobContext {
    /// Uses the caller's company and role when given, otherwise infers them.
    pub fn infer(description: &str, company: Option<&str>, role: Option<&str>) -> Self {
        let inferred = jd_metadata::extract_metadata(description);
        let given = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        JobContext {
            company_name: given(company).or(inferred.company_name),
            role_title: given(role).or(inferred.role_title),
            keywords: jd_metadata::extract_keywords(description),
        }
    }

    pub fn for_prompt<'a>(&'a self, resume: &'a ResumeContent, description: &'a str) -> TailoringContext<'a> {
        TailoringContext {
            resume,
            job_description: description,
            company_name: self.company_name.as_deref(),
            role_title: self.role_title.as_deref(),
            keywords: &self.keywords,
        }
    }
}

/// Implement this to swap the tailoring backend without touching handlers.
#[async_trait]
pub trait TailoringService: Send + Sync {
    async fn tailor(&self, request: &TailorRequest) -> Result<TailoredResume, AppError>;

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<CoverLetter, AppError>;
}

pub struct LlmTailoringService {
    llm: LlmClient,
}

impl LlmTailoringService {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TailoringService for LlmTailoringService {
    async fn tailor(&self, request: &TailorRequest) -> Result<TailoredResume, AppError> {
        let job = JobContext::infer(
            &request.job_description,
            request.company_name.as_deref(),
            request.role_title.as_deref(),
        );
        debug!(company = ?job.company_name, role = ?job.role_title, "Tailoring resume");

        let prompt = prompts::build_tailor_prompt(&job.for_prompt(&request.resume, &request.job_description));
        let tailored: TailoredResume = self
            .llm
            .call_json(&prompt, prompts::JSON_ONLY_SYSTEM, TAILOR_MAX_TOKENS)
            .await?;

        if !tailored.is_valid() {
            return Err(AppError::Llm(format!(
                "match score {} outside 0-100",
                tailored.match_score
            )));
        }
        info!(score = tailored.match_score, "Resume tailored");
        Ok(tailored)
    }

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<CoverLetter, AppError> {
        let job = JobContext::infer(
            &request.job_description,
            request.company_name.as_deref(),
            request.role_title.as_deref(),
        );
        let prompt = prompts::build_cover_letter_prompt(
            &job.for_prompt(&request.resume, &request.job_description),
            request.tone.as_str(),
        );
        let letter: CoverLetter = self
            .llm
            .call_json(&prompt, prompts::JSON_ONLY_SYSTEM, COVER_LETTER_MAX_TOKENS)
            .await?;

        if !letter.is_valid() {
            return Err(AppError::Llm(format!(
                "cover letter length {} outside bounds",
                letter.cover_letter.chars().count()
            )));
        }
        info!(tone = request.tone.as_str(), "Cover letter generated");
        Ok(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_given_metadata_wins_over_inference() {
        let jd = "Platform Engineer - Nimbus\nJoin Nimbus Labs in building Rust services.";
        let job = JobContext::infer(jd, Some("Given Co"), None);
        assert_eq!(job.company_name.as_deref(), Some("Given Co"));
        assert_eq!(job.role_title.as_deref(), Some("Platform Engineer"));
        assert_eq!(job.keywords, vec!["Rust"]);
    }

    #[test]
    fn test_blank_metadata_is_treated_as_absent() {
        let jd = "Join Nimbus Labs in building things.";
        let job = JobContext::infer(jd, Some("  "), None);
        assert_eq!(job.company_name.as_deref(), Some("Nimbus Labs"));
    }
}
