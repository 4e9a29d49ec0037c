pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::documents::handlers as documents;
use crate::matching::handlers as matching;
use crate::onboarding::handlers as onboarding;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Onboarding wizard
        .route("/api/v1/seekers", post(onboarding::handle_provision))
        .route("/api/v1/timeline", get(onboarding::handle_get_timeline))
        .route("/api/v1/timeline/next", get(onboarding::handle_next_step))
        .route("/api/v1/profile", get(onboarding::handle_get_profile))
        .route(
            "/api/v1/profile/summary",
            get(onboarding::handle_profile_summary),
        )
        .route(
            "/api/v1/profile/personal-info",
            put(onboarding::handle_personal_info),
        )
        .route(
            "/api/v1/profile/professional-summary",
            put(onboarding::handle_professional_summary),
        )
        .route(
            "/api/v1/profile/work-experiences",
            post(onboarding::handle_add_work_experience),
        )
        .route(
            "/api/v1/profile/education",
            post(onboarding::handle_add_education),
        )
        .route(
            "/api/v1/profile/certificates",
            post(onboarding::handle_add_certificate),
        )
        .route(
            "/api/v1/profile/certificates/upload",
            post(onboarding::handle_upload_certificate),
        )
        .route(
            "/api/v1/profile/languages",
            post(onboarding::handle_add_language),
        )
        .route(
            "/api/v1/profile/languages/upload",
            post(onboarding::handle_upload_language),
        )
        .route(
            "/api/v1/profile/job-titles",
            put(onboarding::handle_job_titles),
        )
        // Jobs
        .route("/api/v1/jobs", get(matching::handle_list_jobs))
        .route(
            "/api/v1/jobs/selected",
            get(matching::handle_list_selected).post(matching::handle_select_job),
        )
        .route(
            "/api/v1/jobs/saved",
            get(matching::handle_list_saved).post(matching::handle_save_job),
        )
        .route("/api/v1/jobs/link", post(matching::handle_job_link))
        .route(
            "/api/v1/jobs/:job_id/match-score",
            get(matching::handle_match_score),
        )
        // Documents
        .route(
            "/api/v1/documents/cover-letter",
            post(documents::handle_cover_letter),
        )
        .route("/api/v1/documents/cv", post(documents::handle_cv))
        .with_state(state)
}
