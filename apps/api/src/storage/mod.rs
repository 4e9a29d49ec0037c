//! Persistence collaborators.
//!
//! The onboarding and matching code only sees these traits. `postgres` is the
//! production backend; `memory` backs the unit and router tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::job::{Job, JobLink, SavedJob, SelectedJob};
use crate::models::profile::Profile;
use crate::models::timeline::ProgressTimeline;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),
}

/// Which generated document a selected job has received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedDocument {
    CoverLetter,
    Cv,
}

/// Profile document + progress timeline, keyed by user.
#[async_trait]
pub trait SeekerStore: Send + Sync {
    /// Creates the empty profile and the fresh timeline together.
    async fn create_seeker(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError>;

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, StoreError>;

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn fetch_timeline(&self, user_id: Uuid) -> Result<ProgressTimeline, StoreError>;

    async fn save_timeline(&self, timeline: &ProgressTimeline) -> Result<(), StoreError>;

    /// Persists a profile change and its timeline flag as one unit.
    async fn commit_step(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError>;
}

/// Read access to the ingested job postings.
#[async_trait]
pub trait JobCorpus: Send + Sync {
    /// Jobs whose title may contain any of `title_substrings`, in corpus order.
    async fn list_jobs(&self, title_substrings: &[String]) -> Result<Vec<Job>, StoreError>;

    async fn get_job(&self, job_id: &str) -> Result<Job, StoreError>;

    async fn get_job_link(&self, job_id: &str) -> Result<JobLink, StoreError>;
}

/// Jobs a seeker selected to apply for or saved for later.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn select_job(&self, selection: &SelectedJob) -> Result<(), StoreError>;

    async fn get_selection(&self, user_id: Uuid, job_id: &str) -> Result<SelectedJob, StoreError>;

    /// One page of selections, oldest first, plus the total count.
    async fn list_selected(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<SelectedJob>, usize), StoreError>;

    async fn mark_document_generated(
        &self,
        user_id: Uuid,
        job_id: &str,
        document: GeneratedDocument,
    ) -> Result<(), StoreError>;

    async fn mark_link_viewed(&self, user_id: Uuid, job_id: &str) -> Result<(), StoreError>;

    async fn save_job(&self, saved: &SavedJob) -> Result<(), StoreError>;

    /// One page of saved jobs, oldest save first, plus the total count.
    /// Saves whose job left the corpus are skipped.
    async fn list_saved(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, usize), StoreError>;
}
