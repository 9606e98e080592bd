//! Content schema rules for a complete resume and for job descriptions.
//!
//! Every violation is collected rather than stopping at the first, so the
//! editor can show field-level feedback in one pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{EducationEntry, ExperienceEntry, ResumeContent};
use crate::tailoring::JobDescription;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path into the content, e.g. `experience[0].bullets[1]`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

pub const SUMMARY_MIN_CHARS: usize = 50;
pub const SUMMARY_MAX_CHARS: usize = 500;
pub const MIN_SKILLS: usize = 3;
pub const MIN_BULLET_CHARS: usize = 10;
pub const JOB_DESCRIPTION_MIN_CHARS: usize = 100;
pub const JOB_DESCRIPTION_MAX_CHARS: usize = 10_000;

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn require_min(errors: &mut Vec<FieldError>, field: String, value: &str, min: usize, label: &str) {
    if char_len(value) < min {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min} characters"),
        ));
    }
}

/// Loose address check: one `@`, a non-empty local part, a dotted domain.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Validates a resume for completeness. Returns every violation found.
pub fn validate_content(content: &ResumeContent) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let contact = &content.contact_info;
    require_min(&mut errors, "contactInfo.name".into(), &contact.name, 2, "Name");
    if !is_plausible_email(&contact.email) {
        errors.push(FieldError::new("contactInfo.email", "Invalid email address"));
    }
    require_min(&mut errors, "contactInfo.phone".into(), &contact.phone, 10, "Phone");
    require_min(
        &mut errors,
        "contactInfo.location".into(),
        &contact.location,
        2,
        "Location",
    );

    let summary_len = char_len(&content.summary);
    if summary_len < SUMMARY_MIN_CHARS {
        errors.push(FieldError::new(
            "summary",
            format!("Summary must be at least {SUMMARY_MIN_CHARS} characters"),
        ));
    } else if summary_len > SUMMARY_MAX_CHARS {
        errors.push(FieldError::new(
            "summary",
            format!("Summary must be at most {SUMMARY_MAX_CHARS} characters"),
        ));
    }

    if content.experience.is_empty() {
        errors.push(FieldError::new(
            "experience",
            "At least one experience entry required",
        ));
    }
    for (i, entry) in content.experience.iter().enumerate() {
        validate_experience(&mut errors, i, entry);
    }

    if content.education.is_empty() {
        errors.push(FieldError::new(
            "education",
            "At least one education entry required",
        ));
    }
    for (i, entry) in content.education.iter().enumerate() {
        validate_education(&mut errors, i, entry);
    }

    if content.skills.len() < MIN_SKILLS {
        errors.push(FieldError::new(
            "skills",
            format!("At least {MIN_SKILLS} skills required"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn validate_experience(errors: &mut Vec<FieldError>, i: usize, entry: &ExperienceEntry) {
    let at = |f: &str| format!("experience[{i}].{f}");
    require_min(errors, at("title"), &entry.title, 2, "Job title");
    require_min(errors, at("company"), &entry.company, 2, "Company name");
    require_min(errors, at("dates"), &entry.dates, 3, "Dates");
    require_min(errors, at("location"), &entry.location, 2, "Location");
    if entry.bullets.is_empty() {
        errors.push(FieldError::new(
            at("bullets"),
            "At least one bullet point required",
        ));
    }
    for (j, bullet) in entry.bullets.iter().enumerate() {
        require_min(
            errors,
            format!("experience[{i}].bullets[{j}]"),
            bullet,
            MIN_BULLET_CHARS,
            "Bullet",
        );
    }
}

fn validate_education(errors: &mut Vec<FieldError>, i: usize, entry: &EducationEntry) {
    let at = |f: &str| format!("education[{i}].{f}");
    require_min(errors, at("school"), &entry.school, 2, "School name");
    require_min(errors, at("degree"), &entry.degree, 2, "Degree");
    require_min(errors, at("dates"), &entry.dates, 4, "Dates");
}

/// Validates a pasted job description before it is sent for tailoring.
pub fn validate_job_description(jd: &JobDescription) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let len = char_len(&jd.description);
    if len < JOB_DESCRIPTION_MIN_CHARS {
        errors.push(FieldError::new(
            "description",
            format!("Job description must be at least {JOB_DESCRIPTION_MIN_CHARS} characters"),
        ));
    } else if len > JOB_DESCRIPTION_MAX_CHARS {
        errors.push(FieldError::new("description", "Job description too long"));
    }

    if let Some(site) = jd.employer_website.as_deref() {
        let site = site.trim();
        if !site.is_empty() && !(site.starts_with("http://") || site.starts_with("https://")) {
            errors.push(FieldError::new("employerWebsite", "Invalid URL"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
