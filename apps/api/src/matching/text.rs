use std::fmt::Write;

use crate::models::job::Job;
use crate::models::profile::Profile;

/// Flattens a profile into the free text fed to the match scorer.
pub fn profile_text(profile: &Profile) -> String {
    let mut out = String::new();

    let (skills, about) = profile
        .professional_summary
        .as_ref()
        .map(|s| (s.skills.join(", "), s.about.as_str()))
        .unwrap_or_default();
    let _ = write!(out, "Skills: {skills}. About: {about}. ");

    out.push_str("Work Experience: ");
    for exp in &profile.work_experiences {
        let _ = write!(
            out,
            "Job Title: {}. Responsibilities: {}. ",
            exp.job_title, exp.key_responsibilities
        );
    }

    out.push_str("Education: ");
    for edu in &profile.education {
        let _ = write!(
            out,
            "Degree: {} in {}. Achievements: {}. ",
            edu.degree,
            edu.field_of_study,
            edu.achievements.as_deref().unwrap_or_default()
        );
    }

    out.push_str("Certificates: ");
    for cert in &profile.certificates {
        let _ = write!(out, "Certificate: {}. ", cert.certificate_name);
    }

    out.push_str("Languages: ");
    for lang in &profile.languages {
        let _ = write!(
            out,
            "Language: {} ({}). ",
            lang.language_name, lang.proficiency_level
        );
    }

    let titles = profile
        .preferred_titles
        .as_ref()
        .map(|t| {
            [Some(t.primary.as_str()), t.secondary.as_deref(), t.tertiary.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let _ = write!(out, "Preferred Job Titles: {titles}.");

    out
}

pub fn job_text(job: &Job) -> String {
    format!(
        "Title: {}. Description: {}. Skills: {}. Type: {}.",
        job.title, job.description, job.skills, job.job_type
    )
}
