//! Axum route handlers for job retrieval, selection, saved jobs and apply links.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::identity::SeekerId;
use crate::matching::retrieval::ScoredJob;
use crate::matching::selection::{
    job_link, list_matching_jobs, list_saved_jobs, list_selected_jobs, match_score_for_job,
    save_job, select_job,
};
use crate::models::job::{JobLink, SavedJob, SelectedJob};
use crate::pagination::{PageMeta, PageQuery};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<ScoredJob>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub job_id: String,
    pub match_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct SelectJobRequest {
    #[serde(default)]
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveJobRequest {
    #[serde(default)]
    pub job_id: String,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectedJobsResponse {
    pub selected_jobs: Vec<SelectedJob>,
    pub pagination: PageMeta,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs?page=&limit=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Query(query): Query<PageQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let (jobs, pagination) = list_matching_jobs(&state, user_id, query.resolve()).await?;
    Ok(Json(JobListResponse { jobs, pagination }))
}

/// GET /api/v1/jobs/:job_id/match-score
pub async fn handle_match_score(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Path(job_id): Path<String>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    let scored = match_score_for_job(&state, user_id, &job_id).await?;
    Ok(Json(MatchScoreResponse {
        job_id: scored.job.job_id,
        match_score: scored.match_score,
    }))
}

/// POST /api/v1/jobs/selected
pub async fn handle_select_job(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(req): Json<SelectJobRequest>,
) -> Result<(StatusCode, Json<SelectedJob>), AppError> {
    let selection = select_job(&state, user_id, &req.job_id).await?;
    Ok((StatusCode::CREATED, Json(selection)))
}

/// GET /api/v1/jobs/selected?page=&limit=
pub async fn handle_list_selected(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Query(query): Query<PageQuery>,
) -> Result<Json<SelectedJobsResponse>, AppError> {
    let (selected_jobs, pagination) = list_selected_jobs(&state, user_id, query.resolve()).await?;
    Ok(Json(SelectedJobsResponse {
        selected_jobs,
        pagination,
    }))
}

/// POST /api/v1/jobs/saved
pub async fn handle_save_job(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(req): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<SavedJob>), AppError> {
    let saved = save_job(&state, user_id, &req.job_id, req.source).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/jobs/saved?page=&limit=
pub async fn handle_list_saved(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Query(query): Query<PageQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let (jobs, pagination) = list_saved_jobs(&state, user_id, query.resolve()).await?;
    Ok(Json(JobListResponse { jobs, pagination }))
}

/// POST /api/v1/jobs/link
pub async fn handle_job_link(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(req): Json<SelectJobRequest>,
) -> Result<Json<JobLink>, AppError> {
    Ok(Json(job_link(&state, user_id, &req.job_id).await?))
}
