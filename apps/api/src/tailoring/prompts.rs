// Prompt text for the tailoring service.

use std::fmt::Write;

use resume_model::ResumeContent;

use crate::tailoring::TailoringContext;

/// Shared system prompt: JSON only, no prose.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert resume writer and career coach \
    specializing in ATS (applicant tracking system) optimization. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

const HONESTY_RULE: &str = "\
    Never fabricate achievements, employers, dates or skills. \
    Only emphasize and reframe what the resume already contains.";

const TAILOR_OUTPUT_SCHEMA: &str = r#"{
  "summary": "Tailored professional summary, 50-120 words",
  "experience": [
    {
      "title": "Original job title (unchanged)",
      "company": "Original company (unchanged)",
      "dates": "Original dates (unchanged)",
      "location": "Original location (unchanged)",
      "bullets": ["Action verb + what was done + impact", "..."]
    }
  ],
  "skills": ["Prioritized", "skills"],
  "matchScore": 85,
  "keyChanges": ["What changed and why, 3-5 items"],
  "atsKeywords": ["10-15 critical keywords from the posting"]
}"#;

const COVER_LETTER_OUTPUT_SCHEMA: &str = r#"{
  "coverLetter": "The complete letter, paragraphs separated by blank lines",
  "tone": "professional",
  "keyPoints": ["Main selling point", "..."]
}"#;

fn job_header(out: &mut String, ctx: &TailoringContext<'_>) {
    let _ = writeln!(out, "## Job Description\n\n{}\n", ctx.job_description.trim());
    if let Some(company) = ctx.company_name {
        let _ = writeln!(out, "**Company**: {company}");
    }
    if let Some(role) = ctx.role_title {
        let _ = writeln!(out, "**Role**: {role}");
    }
    if !ctx.keywords.is_empty() {
        let _ = writeln!(out, "**Technical keywords seen**: {}", ctx.keywords.join(", "));
    }
    out.push('\n');
}

fn full_resume(out: &mut String, resume: &ResumeContent) {
    let contact = &resume.contact_info;
    let _ = writeln!(
        out,
        "## Current Resume\n\n**Contact**: {} | {} | {} | {}\n",
        contact.name, contact.email, contact.phone, contact.location
    );
    let _ = writeln!(out, "**Summary**:\n{}\n", resume.summary);

    out.push_str("**Experience**:\n");
    for (i, exp) in resume.experience.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} at {} ({}) | {}",
            i + 1,
            exp.title,
            exp.company,
            exp.dates,
            exp.location
        );
        for bullet in &exp.bullets {
            let _ = writeln!(out, "   - {bullet}");
        }
    }

    out.push_str("\n**Education**:\n");
    for edu in &resume.education {
        let _ = writeln!(out, "- {} - {} ({})", edu.degree, edu.school, edu.dates);
    }
    let _ = writeln!(out, "\n**Skills**: {}\n", resume.skills.join(", "));
}

pub fn build_tailor_prompt(ctx: &TailoringContext<'_>) -> String {
    let mut out = String::from(
        "Tailor the resume below to the job description. Maximize the chance of passing \
         ATS screening and impressing a human recruiter while staying completely accurate.\n\n",
    );
    job_header(&mut out, ctx);
    full_resume(&mut out, ctx.resume);

    let _ = write!(
        out,
        "## Instructions\n\n\
         1. Rewrite the summary for this role and company, naming the 3-4 most relevant \
         qualifications. Write without first-person pronouns.\n\
         2. For every experience entry keep title, company, dates and location unchanged \
         and rewrite 3-5 bullets to surface the skills the posting asks for.\n\
         3. Reorder skills so the posting's skills come first; add a skill only if the \
         experience clearly implies it.\n\
         4. Leave contact information and education out of the output; they stay as they are.\n\
         5. matchScore is your 0-100 estimate of fit.\n\n\
         {HONESTY_RULE}\n\n\
         Return a JSON object with exactly this shape:\n{TAILOR_OUTPUT_SCHEMA}\n"
    );
    out
}

pub fn build_cover_letter_prompt(ctx: &TailoringContext<'_>, tone: &str) -> String {
    let mut out = String::from("Write a cover letter for this job application.\n\n");
    job_header(&mut out, ctx);

    let resume = ctx.resume;
    let _ = writeln!(
        out,
        "## Candidate\n\n**Name**: {}\n**Summary**: {}\n\n**Recent experience**:",
        resume.contact_info.name, resume.summary
    );
    for exp in resume.experience.iter().take(2) {
        let _ = writeln!(out, "- {} at {} ({})", exp.title, exp.company, exp.dates);
    }
    let _ = writeln!(out, "\n**Skills**: {}\n", resume.skills.join(", "));

    let _ = write!(
        out,
        "## Instructions\n\n\
         Write 250-400 words in a {tone} tone: an opening that names the position, a \
         paragraph on why this company, 2-3 concrete experiences that match the \
         requirements, and a short closing.\n\n\
         {HONESTY_RULE}\n\n\
         Return a JSON object with exactly this shape:\n{COVER_LETTER_OUTPUT_SCHEMA}\n"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_model::ExperienceEntry;

    fn resume() -> ResumeContent {
        ResumeContent {
            summary: "Backend engineer".to_string(),
            experience: (1..=3)
                .map(|i| ExperienceEntry {
                    title: format!("Role {i}"),
                    company: format!("Company {i}"),
                    dates: "2020 - 2021".to_string(),
                    location: "Remote".to_string(),
                    bullets: vec![format!("Bullet for role {i}")],
                })
                .collect(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_tailor_prompt_includes_context() {
        let resume = resume();
        let keywords = vec!["Rust".to_string()];
        let ctx = TailoringContext {
            resume: &resume,
            job_description: "Build payment rails in Rust.",
            company_name: Some("Acme"),
            role_title: None,
            keywords: &keywords,
        };
        let prompt = build_tailor_prompt(&ctx);
        assert!(prompt.contains("**Company**: Acme"));
        assert!(!prompt.contains("**Role**"));
        assert!(prompt.contains("Bullet for role 3"));
        assert!(prompt.contains("\"matchScore\""));
        assert!(prompt.contains("Rust, SQL"));
    }

    #[test]
    fn test_cover_letter_prompt_uses_two_most_recent_roles_and_tone() {
        let resume = resume();
        let ctx = TailoringContext {
            resume: &resume,
            job_description: "Build payment rails in Rust.",
            company_name: None,
            role_title: Some("Backend Engineer"),
            keywords: &[],
        };
        let prompt = build_cover_letter_prompt(&ctx, "enthusiastic");
        assert!(prompt.contains("Role 2 at Company 2"));
        assert!(!prompt.contains("Role 3 at Company 3"));
        assert!(prompt.contains("enthusiastic tone"));
        assert!(prompt.contains("\"coverLetter\""));
    }
}
