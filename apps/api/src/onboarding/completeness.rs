use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub weight: u32,
    pub entry_count: usize,
    pub status: SectionStatus,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// 0..=100, sum of the weights of the present sections.
    pub percentage: u32,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

const SECTION_WEIGHTS: &[(&str, u32)] = &[
    ("personal_info", 15),
    ("professional_summary", 20),
    ("work_experiences", 20),
    ("education", 15),
    ("certificates", 10),
    ("languages", 10),
    ("preferred_job_titles", 10),
];

fn entry_count(profile: &Profile, section: &str) -> usize {
    match section {
        "personal_info" => usize::from(profile.personal_info.is_some()),
        "professional_summary" => usize::from(profile.professional_summary.is_some()),
        "work_experiences" => profile.work_experiences.len(),
        "education" => profile.education.len(),
        "certificates" => profile.certificates.len(),
        "languages" => profile.languages.len(),
        "preferred_job_titles" => usize::from(profile.preferred_titles.is_some()),
        _ => 0,
    }
}

/// Additive completion: each section counts its full weight once it has any
/// content. Independent of which timeline steps are required.
pub fn compute_completeness_report(profile: &Profile) -> CompletenessReport {
    let mut sections = Vec::with_capacity(SECTION_WEIGHTS.len());
    let mut missing_sections = Vec::new();
    let mut percentage = 0;

    for &(section, weight) in SECTION_WEIGHTS {
        let count = entry_count(profile, section);
        if count == 0 {
            missing_sections.push(section.to_string());
            sections.push(SectionHealth {
                section: section.to_string(),
                weight,
                entry_count: 0,
                status: SectionStatus::Missing,
                recommendation: Some(format!(
                    "Add your {} to strengthen your profile",
                    section.replace('_', " ")
                )),
            });
            continue;
        }

        percentage += weight;
        sections.push(SectionHealth {
            section: section.to_string(),
            weight,
            entry_count: count,
            status: SectionStatus::Complete,
            recommendation: None,
        });
    }

    CompletenessReport {
        percentage,
        sections,
        missing_sections,
    }
}
