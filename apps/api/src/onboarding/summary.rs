use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::profile::{Profile, WorkExperience};
use crate::onboarding::completeness::{compute_completeness_report, CompletenessReport};

/// Dashboard view of a seeker's profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub user_id: Uuid,
    pub first_name: String,
    pub second_name: Option<String>,
    pub skills: Vec<String>,
    pub total_experience_in_months: u32,
    pub certificates: Vec<String>,
    pub languages: Vec<String>,
    pub preferred_job_title: Option<String>,
    pub total_applications: usize,
    pub completion: CompletenessReport,
}

pub fn summarize_profile(profile: &Profile, total_applications: usize, today: NaiveDate) -> ProfileSummary {
    let (first_name, second_name) = profile
        .personal_info
        .as_ref()
        .map(|p| (p.first_name.clone(), p.second_name.clone()))
        .unwrap_or_default();

    ProfileSummary {
        user_id: profile.user_id,
        first_name,
        second_name,
        skills: profile
            .professional_summary
            .as_ref()
            .map(|s| s.skills.clone())
            .unwrap_or_default(),
        total_experience_in_months: total_experience_months(&profile.work_experiences, today),
        certificates: profile
            .certificates
            .iter()
            .map(|c| c.certificate_name.clone())
            .collect(),
        languages: profile
            .languages
            .iter()
            .map(|l| l.language_name.clone())
            .collect(),
        preferred_job_title: profile.preferred_titles.as_ref().map(|t| t.primary.clone()),
        total_applications,
        completion: compute_completeness_report(profile),
    }
}

/// Calendar-month span per entry (day of month ignored), ongoing entries
/// counted up to `today`, negative spans counted as zero.
pub fn total_experience_months(experiences: &[WorkExperience], today: NaiveDate) -> u32 {
    experiences
        .iter()
        .map(|exp| {
            let end = exp.end_date.unwrap_or(today);
            let years = end.year() - exp.start_date.year();
            let months = end.month() as i32 - exp.start_date.month() as i32;
            u32::try_from(years * 12 + months).unwrap_or(0)
        })
        .sum()
}
