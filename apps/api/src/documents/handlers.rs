//! Axum route handlers for document generation.

use axum::{extract::State, Json};

use crate::documents::generator::{
    generate_document, DocumentKind, DocumentRequest, DocumentResponse,
};
use crate::errors::AppError;
use crate::identity::SeekerId;
use crate::state::AppState;

/// POST /api/v1/documents/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let doc = generate_document(&state, user_id, &req.job_id, DocumentKind::CoverLetter).await?;
    Ok(Json(doc))
}

/// POST /api/v1/documents/cv
pub async fn handle_cv(
    State(state): State<AppState>,
    SeekerId(user_id): SeekerId,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let doc = generate_document(&state, user_id, &req.job_id, DocumentKind::Cv).await?;
    Ok(Json(doc))
}
