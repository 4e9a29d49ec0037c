use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The per-user profile document filled in by the onboarding wizard.
///
/// Stored as a single JSONB document. List sections always decode to an
/// empty vector, even when the stored value is `null` or missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub user_id: Uuid,
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub professional_summary: Option<ProfessionalSummary>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub certificates: Vec<Certificate>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub preferred_titles: Option<PreferredTitles>,
}

impl Profile {
    /// An empty profile, as created at signup.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            personal_info: None,
            professional_summary: None,
            work_experiences: Vec::new(),
            education: Vec::new(),
            certificates: Vec::new(),
            languages: Vec::new(),
            preferred_titles: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalInfo {
    pub first_name: String,
    pub second_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub linkedin_profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfessionalSummary {
    pub about: String,
    pub skills: Vec<String>,
    pub annual_income: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkExperience {
    pub job_title: String,
    pub company_name: String,
    pub employment_type: String,
    pub start_date: NaiveDate,
    /// `None` = current position.
    pub end_date: Option<NaiveDate>,
    pub key_responsibilities: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certificate {
    pub certificate_name: String,
    pub certificate_file: Option<String>,
    pub certificate_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Language {
    pub language_name: String,
    pub proficiency_level: String,
    pub certificate_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferredTitles {
    pub primary: String,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
