use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting from the ingested corpus.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Job {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: Option<NaiveDate>,
    pub job_type: String,
    /// Free text as scraped, usually comma separated.
    pub skills: String,
    pub description: String,
}

/// A job the seeker chose to apply for.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SelectedJob {
    pub user_id: Uuid,
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub match_score: f64,
    pub cv_generated: bool,
    pub cover_letter_generated: bool,
    /// Set once the seeker has fetched the apply link.
    pub view_link: bool,
    pub selected_at: DateTime<Utc>,
}

/// A job bookmarked for later, without applying.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedJob {
    pub user_id: Uuid,
    pub job_id: String,
    /// Where the seeker found the job (listing, search, ...). Free text.
    pub source: String,
    pub saved_at: DateTime<Utc>,
}

/// Where to apply for a job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct JobLink {
    pub job_id: String,
    pub job_link: String,
    pub source: String,
}
