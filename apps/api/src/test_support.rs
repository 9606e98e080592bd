//! Fixtures shared by handler and service tests.

use std::sync::Arc;

use async_trait::async_trait;
use resume_model::tailoring::{CoverLetter, CoverLetterRequest, TailorRequest, TailoredResume};
use resume_model::{ContactInfo, EducationEntry, ExperienceEntry, ResumeContent};

use crate::errors::AppError;
use crate::resumes::memory::InMemoryResumeRepository;
use crate::state::AppState;
use crate::tailoring::TailoringService;

pub fn complete_content() -> ResumeContent {
    ResumeContent {
        contact_info: ContactInfo {
            name: "Grace Hopper".to_string(),
            email: "grace@navy.example.mil".to_string(),
            phone: "+1 555 010 0100".to_string(),
            location: "Arlington, VA".to_string(),
        },
        summary: "Computer scientist who built the first compiler and championed \
                  machine-independent programming languages."
            .to_string(),
        experience: vec![ExperienceEntry {
            title: "Senior Programmer".to_string(),
            company: "Remington Rand".to_string(),
            dates: "1949 - 1967".to_string(),
            location: "Philadelphia".to_string(),
            bullets: vec!["Developed the A-0 compiler for UNIVAC I".to_string()],
        }],
        education: vec![EducationEntry {
            school: "Yale University".to_string(),
            degree: "PhD Mathematics".to_string(),
            dates: "1930 - 1934".to_string(),
        }],
        skills: vec![
            "COBOL".to_string(),
            "Compilers".to_string(),
            "Leadership".to_string(),
        ],
    }
}

/// Returns canned results without calling a model.
pub struct StubTailor;

#[async_trait]
impl TailoringService for StubTailor {
    async fn tailor(&self, request: &TailorRequest) -> Result<TailoredResume, AppError> {
        Ok(TailoredResume {
            summary: "Tailored summary".to_string(),
            experience: request.resume.experience.clone(),
            skills: request.resume.skills.clone(),
            match_score: 72.0,
            key_changes: vec!["Reordered skills".to_string()],
            ats_keywords: vec![],
        })
    }

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<CoverLetter, AppError> {
        Ok(CoverLetter {
            cover_letter: "Dear hiring team, ".repeat(20),
            tone: request.tone.as_str().to_string(),
            key_points: vec![],
        })
    }
}

pub fn test_state() -> AppState {
    AppState {
        resumes: Arc::new(InMemoryResumeRepository::new()),
        tailor: Arc::new(StubTailor),
    }
}
