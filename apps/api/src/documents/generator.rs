//! Cover letter and CV generation.
//!
//! Flow: fetch profile → fetch job → build prompt → model call →
//!       flag the matching selection (if any) → return plain text.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::documents::prompts::{document_prompt, COVER_LETTER_SYSTEM, CV_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::models::job::Job;
use crate::models::profile::Profile;
use crate::state::AppState;
use crate::storage::{GeneratedDocument, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    CoverLetter,
    Cv,
}

impl DocumentKind {
    fn label(self) -> &'static str {
        match self {
            DocumentKind::CoverLetter => "cover letter",
            DocumentKind::Cv => "CV",
        }
    }

    fn system_prompt(self) -> String {
        let base = match self {
            DocumentKind::CoverLetter => COVER_LETTER_SYSTEM,
            DocumentKind::Cv => CV_SYSTEM,
        };
        format!("{base}\n\n{GROUNDING_INSTRUCTION}\n\n{PLAIN_TEXT_INSTRUCTION}")
    }

    fn generated(self) -> GeneratedDocument {
        match self {
            DocumentKind::CoverLetter => GeneratedDocument::CoverLetter,
            DocumentKind::Cv => GeneratedDocument::Cv,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    #[serde(default)]
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub kind: DocumentKind,
    pub job_id: String,
    pub model: String,
    pub content: String,
}

/// Candidate block for the prompt. Only sections with data are written.
pub fn render_candidate(profile: &Profile) -> String {
    let mut out = String::new();

    if let Some(info) = &profile.personal_info {
        let name = match &info.second_name {
            Some(second) => format!("{} {}", info.first_name, second),
            None => info.first_name.clone(),
        };
        let _ = writeln!(out, "Name: {name}");
        let _ = writeln!(out, "Address: {}", info.address);
        if let Some(linkedin) = &info.linkedin_profile {
            let _ = writeln!(out, "LinkedIn: {linkedin}");
        }
    }
    if let Some(titles) = &profile.preferred_titles {
        let _ = writeln!(out, "Designation: {}", titles.primary);
    }
    if let Some(summary) = &profile.professional_summary {
        let _ = writeln!(out, "About: {}", summary.about);
        let _ = writeln!(out, "Skills: {}", summary.skills.join(", "));
    }

    if !profile.work_experiences.is_empty() {
        out.push_str("Experience:\n");
        for exp in &profile.work_experiences {
            let end = exp
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "present".to_string());
            let _ = writeln!(
                out,
                "- {} at {} ({}, {} to {}): {}",
                exp.job_title,
                exp.company_name,
                exp.employment_type,
                exp.start_date,
                end,
                exp.key_responsibilities
            );
        }
    }

    if !profile.education.is_empty() {
        out.push_str("Education:\n");
        for edu in &profile.education {
            let _ = write!(
                out,
                "- {} in {}, {}",
                edu.degree, edu.field_of_study, edu.institution
            );
            if let Some(achievements) = &edu.achievements {
                let _ = write!(out, ". Achievements: {achievements}");
            }
            out.push('\n');
        }
    }

    if !profile.certificates.is_empty() {
        out.push_str("Certifications:\n");
        for cert in &profile.certificates {
            let _ = writeln!(out, "- {}", cert.certificate_name);
        }
    }

    if !profile.languages.is_empty() {
        out.push_str("Languages:\n");
        for lang in &profile.languages {
            let _ = writeln!(out, "- {} ({})", lang.language_name, lang.proficiency_level);
        }
    }

    out
}

pub fn render_job(job: &Job) -> String {
    format!(
        "Title: {}\nCompany: {}\nLocation: {}\nType: {}\nSkills: {}\nDescription:\n{}\n",
        job.title, job.company, job.location, job.job_type, job.skills, job.description
    )
}

/// Returns `(system, prompt)`.
pub fn build_prompt(kind: DocumentKind, profile: &Profile, job: &Job) -> (String, String) {
    let prompt = document_prompt(kind.label(), &render_candidate(profile), &render_job(job));
    (kind.system_prompt(), prompt)
}

pub async fn generate_document(
    state: &AppState,
    user_id: Uuid,
    job_id: &str,
    kind: DocumentKind,
) -> Result<DocumentResponse, AppError> {
    if job_id.trim().is_empty() {
        return Err(AppError::Validation("job_id is required".to_string()));
    }

    let profile = state.seekers.fetch_profile(user_id).await?;
    if profile.personal_info.is_none() {
        return Err(AppError::Validation(
            "Personal info is required before generating documents".to_string(),
        ));
    }
    let job = state.jobs.get_job(job_id).await?;

    let (system, prompt) = build_prompt(kind, &profile, &job);
    let completion = state.llm.generate(&prompt, &system).await?;

    match state
        .applications
        .mark_document_generated(user_id, job_id, kind.generated())
        .await
    {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            debug!("Job {job_id} not selected by {user_id}; nothing to flag");
        }
        Err(e) => return Err(e.into()),
    }

    info!(
        "Generated {} for seeker {user_id}, job {job_id} (model {})",
        kind.label(),
        completion.model
    );

    Ok(DocumentResponse {
        kind,
        job_id: job.job_id,
        model: completion.model,
        content: completion.text,
    })
}
