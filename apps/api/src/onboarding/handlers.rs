//! Axum route handlers for seeker provisioning and the data-entry wizard.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::SeekerId;
use crate::media::UploadedFile;
use crate::models::profile::Profile;
use crate::models::timeline::{ProgressTimeline, Step};
use crate::onboarding::mutators::{
    CertificateInput, EducationInput, JobTitlesInput, LanguageInput, PersonalInfoInput,
    ProfessionalSummaryInput, ProfileUpdate, WorkExperienceInput,
};
use crate::onboarding::service::{evaluate_progress, provision_seeker, record_step};
use crate::onboarding::summary::{summarize_profile, ProfileSummary};
use crate::onboarding::timeline::{next_step, ProgressReport};
use crate::onboarding::validation::FieldErrors;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Returned by every wizard submission.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step: Step,
    pub profile: Profile,
    pub progress: ProgressReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn submit(
    state: &AppState,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<Json<StepResponse>, AppError> {
    let step = update.step();
    let (profile, timeline) = record_step(state.seekers.as_ref(), user_id, update).await?;
    Ok(Json(StepResponse {
        step,
        profile,
        progress: next_step(&timeline).into(),
    }))
}

/// Text fields plus at most one `file` part.
struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(String::from);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            if !bytes.is_empty() {
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field {name}: {e}")))?;
            fields.insert(name, value);
        }
    }

    Ok(UploadForm { fields, file })
}

/// Uploads the attached file, if any, then records the step built around its
/// URL. The upload waits until the seeker is known to exist, and is removed
/// again if the step is rejected or fails to commit.
async fn submit_with_attachment(
    state: &AppState,
    user_id: Uuid,
    file: Option<UploadedFile>,
    folder: &str,
    build: impl FnOnce(Option<String>) -> ProfileUpdate,
) -> Result<Json<StepResponse>, AppError> {
    let Some(file) = file else {
        return submit(state, user_id, build(None)).await;
    };
    state.seekers.fetch_profile(user_id).await?;

    let url = state.media.upload_file(user_id, file, folder).await?;
    let result = submit(state, user_id, build(Some(url.clone()))).await;
    if result.is_err() {
        if let Err(e) = state.media.delete_file(&url).await {
            warn!("Failed to remove orphaned upload {url}: {e}");
        }
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/seekers
pub async fn handle_provision(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
) -> Result<(StatusCode, Json<ProgressTimeline>), AppError> {
    let timeline =
        provision_seeker(state.seekers.as_ref(), user_id, &state.config.required_steps).await?;
    Ok((StatusCode::CREATED, Json(timeline)))
}

/// GET /api/v1/timeline
pub async fn handle_get_timeline(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
) -> Result<Json<ProgressTimeline>, AppError> {
    Ok(Json(state.seekers.fetch_timeline(user_id).await?))
}

/// GET /api/v1/timeline/next
pub async fn handle_next_step(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
) -> Result<Json<ProgressReport>, AppError> {
    Ok(Json(evaluate_progress(state.seekers.as_ref(), user_id).await?))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.seekers.fetch_profile(user_id).await?))
}

/// GET /api/v1/profile/summary
pub async fn handle_profile_summary(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
) -> Result<Json<ProfileSummary>, AppError> {
    let profile = state.seekers.fetch_profile(user_id).await?;
    let (_, total_applications) = state.applications.list_selected(user_id, 0, 0).await?;
    Ok(Json(summarize_profile(
        &profile,
        total_applications,
        Utc::now().date_naive(),
    )))
}

/// PUT /api/v1/profile/personal-info
pub async fn handle_personal_info(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<PersonalInfoInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::PersonalInfo(input)).await
}

/// PUT /api/v1/profile/professional-summary
pub async fn handle_professional_summary(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<ProfessionalSummaryInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::ProfessionalSummary(input)).await
}

/// POST /api/v1/profile/work-experiences
pub async fn handle_add_work_experience(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<WorkExperienceInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::WorkExperience(input)).await
}

/// POST /api/v1/profile/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<EducationInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::Education(input)).await
}

/// POST /api/v1/profile/certificates
pub async fn handle_add_certificate(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<CertificateInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::Certificate(input)).await
}

/// POST /api/v1/profile/certificates/upload (multipart)
/// Fields: certificate_name, certificate_number?, file?
pub async fn handle_upload_certificate(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    multipart: Multipart,
) -> Result<Json<StepResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    // Reject before anything reaches the bucket.
    let mut errors = FieldErrors::new();
    errors.require_text("certificate_name", &form.text("certificate_name"));
    errors.into_result()?;

    let certificate_name = form.text("certificate_name");
    let certificate_number = form.optional("certificate_number");
    submit_with_attachment(&state, user_id, form.file, "certificates", |url| {
        ProfileUpdate::Certificate(CertificateInput {
            certificate_name,
            certificate_number,
            certificate_file: url,
        })
    })
    .await
}

/// POST /api/v1/profile/languages
pub async fn handle_add_language(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<LanguageInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::Language(input)).await
}

/// POST /api/v1/profile/languages/upload (multipart)
/// Fields: language_name, proficiency_level, file?
pub async fn handle_upload_language(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    multipart: Multipart,
) -> Result<Json<StepResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let mut errors = FieldErrors::new();
    errors.require_text("language_name", &form.text("language_name"));
    errors.require_text("proficiency_level", &form.text("proficiency_level"));
    errors.into_result()?;

    let language_name = form.text("language_name");
    let proficiency_level = form.text("proficiency_level");
    submit_with_attachment(&state, user_id, form.file, "languages", |url| {
        ProfileUpdate::Language(LanguageInput {
            language_name,
            proficiency_level,
            certificate_file: url,
        })
    })
    .await
}

/// PUT /api/v1/profile/job-titles
pub async fn handle_job_titles(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(input): Json<JobTitlesInput>,
) -> Result<Json<StepResponse>, AppError> {
    submit(&state, user_id, ProfileUpdate::JobTitles(input)).await
}
