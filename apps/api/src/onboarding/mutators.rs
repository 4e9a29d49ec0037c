//! Per-category profile mutations.
//!
//! Each function validates its input first and only touches the profile once
//! validation has passed, so a rejected call leaves the profile unchanged.
//! List categories append; singleton categories replace the whole record.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::{
    Certificate, Education, Language, PersonalInfo, PreferredTitles, ProfessionalSummary, Profile,
    WorkExperience,
};
use crate::models::timeline::Step;
use crate::onboarding::validation::{normalize_optional, FieldErrors};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfoInput {
    #[serde(default)]
    pub first_name: String,
    pub second_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub linkedin_profile: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionalSummaryInput {
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub annual_income: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkExperienceInput {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub employment_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub key_responsibilities: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationInput {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateInput {
    #[serde(default)]
    pub certificate_name: String,
    /// URL returned by the media store, if a file was attached.
    pub certificate_file: Option<String>,
    pub certificate_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageInput {
    #[serde(default)]
    pub language_name: String,
    #[serde(default)]
    pub proficiency_level: String,
    pub certificate_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTitlesInput {
    #[serde(default)]
    pub primary_title: String,
    pub secondary_title: Option<String>,
    pub tertiary_title: Option<String>,
}

/// One wizard submission, tagged by category.
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    PersonalInfo(PersonalInfoInput),
    ProfessionalSummary(ProfessionalSummaryInput),
    WorkExperience(WorkExperienceInput),
    Education(EducationInput),
    Certificate(CertificateInput),
    Language(LanguageInput),
    JobTitles(JobTitlesInput),
}

impl ProfileUpdate {
    /// The timeline step this update completes.
    pub fn step(&self) -> Step {
        match self {
            ProfileUpdate::PersonalInfo(_) => Step::PersonalInfos,
            ProfileUpdate::ProfessionalSummary(_) => Step::ProfessionalSummaries,
            ProfileUpdate::WorkExperience(_) => Step::WorkExperiences,
            ProfileUpdate::Education(_) => Step::Educations,
            ProfileUpdate::Certificate(_) => Step::Certificates,
            ProfileUpdate::Language(_) => Step::Languages,
            ProfileUpdate::JobTitles(_) => Step::PreferredJobTitles,
        }
    }

    pub fn apply(self, profile: &mut Profile) -> Result<(), AppError> {
        match self {
            ProfileUpdate::PersonalInfo(input) => set_personal_info(profile, input),
            ProfileUpdate::ProfessionalSummary(input) => set_professional_summary(profile, input),
            ProfileUpdate::WorkExperience(input) => add_work_experience(profile, input),
            ProfileUpdate::Education(input) => add_education(profile, input),
            ProfileUpdate::Certificate(input) => add_certificate(profile, input),
            ProfileUpdate::Language(input) => add_language(profile, input),
            ProfileUpdate::JobTitles(input) => set_preferred_titles(profile, input),
        }
    }
}

/// Creates or replaces personal info. Date of birth and address are fixed
/// once set: a different value is rejected, an omitted or equal one is kept.
pub fn set_personal_info(profile: &mut Profile, input: PersonalInfoInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("first_name", &input.first_name);
    let address = normalize_optional(input.address);

    let (date_of_birth, address) = match &profile.personal_info {
        None => {
            errors.require_some("date_of_birth", &input.date_of_birth);
            errors.require_some("address", &address);
            match (input.date_of_birth, address) {
                (Some(dob), Some(address)) if errors.is_empty() => (dob, address),
                _ => return Err(errors.into_error()),
            }
        }
        Some(existing) => {
            let mut changed = Vec::new();
            if input
                .date_of_birth
                .is_some_and(|dob| dob != existing.date_of_birth)
            {
                changed.push("date_of_birth");
            }
            if address.as_deref().is_some_and(|a| a != existing.address) {
                changed.push("address");
            }
            if !changed.is_empty() {
                return Err(AppError::ImmutableField(changed.join(", ")));
            }
            errors.into_result()?;
            (existing.date_of_birth, existing.address.clone())
        }
    };

    profile.personal_info = Some(PersonalInfo {
        first_name: input.first_name.trim().to_string(),
        second_name: normalize_optional(input.second_name),
        date_of_birth,
        address,
        linkedin_profile: normalize_optional(input.linkedin_profile),
    });
    Ok(())
}

pub fn set_professional_summary(
    profile: &mut Profile,
    input: ProfessionalSummaryInput,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("about", &input.about);

    if input.skills.is_empty() {
        errors.push("skills", "must contain at least one skill");
    } else if input.skills.iter().any(|s| s.trim().is_empty()) {
        errors.push("skills", "must not contain blank entries");
    }

    match input.annual_income {
        None => errors.push("annual_income", "is required"),
        Some(income) if !income.is_finite() || income < 0.0 => {
            errors.push("annual_income", "must be a non-negative number")
        }
        Some(_) => {}
    }
    errors.into_result()?;

    profile.professional_summary = Some(ProfessionalSummary {
        about: input.about.trim().to_string(),
        skills: input.skills.iter().map(|s| s.trim().to_string()).collect(),
        annual_income: input.annual_income.unwrap_or_default(),
    });
    Ok(())
}

pub fn add_work_experience(
    profile: &mut Profile,
    input: WorkExperienceInput,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("job_title", &input.job_title);
    errors.require_text("company_name", &input.company_name);
    errors.require_text("employment_type", &input.employment_type);
    errors.require_text("key_responsibilities", &input.key_responsibilities);
    errors.require_some("start_date", &input.start_date);

    let start_date = match input.start_date {
        Some(start) => {
            errors.check_date_range("end_date", start, input.end_date);
            start
        }
        None => return Err(errors.into_error()),
    };
    errors.into_result()?;

    profile.work_experiences.push(WorkExperience {
        job_title: input.job_title.trim().to_string(),
        company_name: input.company_name.trim().to_string(),
        employment_type: input.employment_type.trim().to_string(),
        start_date,
        end_date: input.end_date,
        key_responsibilities: input.key_responsibilities.trim().to_string(),
    });
    Ok(())
}

pub fn add_education(profile: &mut Profile, input: EducationInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("degree", &input.degree);
    errors.require_text("institution", &input.institution);
    errors.require_text("field_of_study", &input.field_of_study);
    errors.require_some("start_date", &input.start_date);

    let start_date = match input.start_date {
        Some(start) => {
            errors.check_date_range("end_date", start, input.end_date);
            start
        }
        None => return Err(errors.into_error()),
    };
    errors.into_result()?;

    profile.education.push(Education {
        degree: input.degree.trim().to_string(),
        institution: input.institution.trim().to_string(),
        field_of_study: input.field_of_study.trim().to_string(),
        start_date,
        end_date: input.end_date,
        achievements: normalize_optional(input.achievements),
    });
    Ok(())
}

/// A missing certificate file is fine.
pub fn add_certificate(profile: &mut Profile, input: CertificateInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("certificate_name", &input.certificate_name);
    errors.into_result()?;

    profile.certificates.push(Certificate {
        certificate_name: input.certificate_name.trim().to_string(),
        certificate_file: normalize_optional(input.certificate_file),
        certificate_number: normalize_optional(input.certificate_number),
    });
    Ok(())
}

pub fn add_language(profile: &mut Profile, input: LanguageInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("language_name", &input.language_name);
    errors.require_text("proficiency_level", &input.proficiency_level);
    errors.into_result()?;

    profile.languages.push(Language {
        language_name: input.language_name.trim().to_string(),
        proficiency_level: input.proficiency_level.trim().to_string(),
        certificate_file: normalize_optional(input.certificate_file),
    });
    Ok(())
}

pub fn set_preferred_titles(profile: &mut Profile, input: JobTitlesInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require_text("primary_title", &input.primary_title);
    errors.into_result()?;

    profile.preferred_titles = Some(PreferredTitles {
        primary: input.primary_title.trim().to_string(),
        secondary: normalize_optional(input.secondary_title),
        tertiary: normalize_optional(input.tertiary_title),
    });
    Ok(())
}
