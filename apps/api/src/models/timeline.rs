use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One onboarding category of the data-entry wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PersonalInfos,
    ProfessionalSummaries,
    WorkExperiences,
    Educations,
    Certificates,
    Languages,
    PreferredJobTitles,
}

impl Step {
    /// Canonical wizard order. The evaluator walks steps in exactly this order.
    pub const ORDER: [Step; 7] = [
        Step::PersonalInfos,
        Step::ProfessionalSummaries,
        Step::WorkExperiences,
        Step::Educations,
        Step::Certificates,
        Step::Languages,
        Step::PreferredJobTitles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::PersonalInfos => "personal_infos",
            Step::ProfessionalSummaries => "professional_summaries",
            Step::WorkExperiences => "work_experiences",
            Step::Educations => "educations",
            Step::Certificates => "certificates",
            Step::Languages => "languages",
            Step::PreferredJobTitles => "preferred_job_titles",
        }
    }
}

/// Which steps must be completed before onboarding counts as done.
/// Fixed when the timeline is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredSteps {
    pub personal_infos: bool,
    pub professional_summaries: bool,
    pub work_experiences: bool,
    pub educations: bool,
    pub certificates: bool,
    pub languages: bool,
    pub preferred_job_titles: bool,
}

impl Default for RequiredSteps {
    fn default() -> Self {
        Self {
            personal_infos: true,
            professional_summaries: true,
            work_experiences: true,
            educations: true,
            certificates: false,
            languages: false,
            preferred_job_titles: true,
        }
    }
}

/// Per-user onboarding progress, 1:1 with the profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProgressTimeline {
    pub user_id: Uuid,

    pub personal_infos_completed: bool,
    pub personal_infos_required: bool,

    pub professional_summaries_completed: bool,
    pub professional_summaries_required: bool,

    pub work_experiences_completed: bool,
    pub work_experiences_required: bool,

    pub educations_completed: bool,
    pub educations_required: bool,

    pub certificates_completed: bool,
    pub certificates_required: bool,

    pub languages_completed: bool,
    pub languages_required: bool,

    pub preferred_job_titles_completed: bool,
    pub preferred_job_titles_required: bool,

    pub completed: bool,
}

impl ProgressTimeline {
    /// A fresh timeline: nothing completed, required flags from `required`.
    pub fn new(user_id: Uuid, required: &RequiredSteps) -> Self {
        Self {
            user_id,
            personal_infos_completed: false,
            personal_infos_required: required.personal_infos,
            professional_summaries_completed: false,
            professional_summaries_required: required.professional_summaries,
            work_experiences_completed: false,
            work_experiences_required: required.work_experiences,
            educations_completed: false,
            educations_required: required.educations,
            certificates_completed: false,
            certificates_required: required.certificates,
            languages_completed: false,
            languages_required: required.languages,
            preferred_job_titles_completed: false,
            preferred_job_titles_required: required.preferred_job_titles,
            completed: false,
        }
    }

    pub fn is_completed(&self, step: Step) -> bool {
        match step {
            Step::PersonalInfos => self.personal_infos_completed,
            Step::ProfessionalSummaries => self.professional_summaries_completed,
            Step::WorkExperiences => self.work_experiences_completed,
            Step::Educations => self.educations_completed,
            Step::Certificates => self.certificates_completed,
            Step::Languages => self.languages_completed,
            Step::PreferredJobTitles => self.preferred_job_titles_completed,
        }
    }

    pub fn is_required(&self, step: Step) -> bool {
        match step {
            Step::PersonalInfos => self.personal_infos_required,
            Step::ProfessionalSummaries => self.professional_summaries_required,
            Step::WorkExperiences => self.work_experiences_required,
            Step::Educations => self.educations_required,
            Step::Certificates => self.certificates_required,
            Step::Languages => self.languages_required,
            Step::PreferredJobTitles => self.preferred_job_titles_required,
        }
    }

    /// Sets the step's completed flag. There is no inverse.
    pub fn mark_completed(&mut self, step: Step) {
        let flag = match step {
            Step::PersonalInfos => &mut self.personal_infos_completed,
            Step::ProfessionalSummaries => &mut self.professional_summaries_completed,
            Step::WorkExperiences => &mut self.work_experiences_completed,
            Step::Educations => &mut self.educations_completed,
            Step::Certificates => &mut self.certificates_completed,
            Step::Languages => &mut self.languages_completed,
            Step::PreferredJobTitles => &mut self.preferred_job_titles_completed,
        };
        *flag = true;
    }
}
