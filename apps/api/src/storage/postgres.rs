use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::job::{Job, JobLink, SavedJob, SelectedJob};
use crate::models::profile::Profile;
use crate::models::timeline::ProgressTimeline;
use crate::storage::{
    ApplicationStore, GeneratedDocument, JobCorpus, SeekerStore, StoreError,
};

const JOB_COLUMNS: &str =
    "job_id, title, company, location, posted_date, job_type, skills, description";

const SAVED_JOB_COLUMNS: &str = "j.job_id, j.title, j.company, j.location, j.posted_date, \
    j.job_type, j.skills, j.description";

const SELECTED_COLUMNS: &str = "user_id, job_id, title, company, location, match_score, \
    cv_generated, cover_letter_generated, view_link, selected_at";

const TIMELINE_COLUMNS: &str = "user_id, \
    personal_infos_completed, personal_infos_required, \
    professional_summaries_completed, professional_summaries_required, \
    work_experiences_completed, work_experiences_required, \
    educations_completed, educations_required, \
    certificates_completed, certificates_required, \
    languages_completed, languages_required, \
    preferred_job_titles_completed, preferred_job_titles_required, \
    completed";

/// Postgres-backed implementation of every storage trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_timeline<'e, E>(executor: E, t: &ProgressTimeline) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO entry_timelines ({TIMELINE_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (user_id) DO NOTHING"
    );
    let result = sqlx::query(&sql)
        .bind(t.user_id)
        .bind(t.personal_infos_completed)
        .bind(t.personal_infos_required)
        .bind(t.professional_summaries_completed)
        .bind(t.professional_summaries_required)
        .bind(t.work_experiences_completed)
        .bind(t.work_experiences_required)
        .bind(t.educations_completed)
        .bind(t.educations_required)
        .bind(t.certificates_completed)
        .bind(t.certificates_required)
        .bind(t.languages_completed)
        .bind(t.languages_required)
        .bind(t.preferred_job_titles_completed)
        .bind(t.preferred_job_titles_required)
        .bind(t.completed)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Writes the completed flags. Required flags are fixed at creation and never updated.
async fn update_timeline<'e, E>(executor: E, t: &ProgressTimeline) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE entry_timelines SET
            personal_infos_completed = $2,
            professional_summaries_completed = $3,
            work_experiences_completed = $4,
            educations_completed = $5,
            certificates_completed = $6,
            languages_completed = $7,
            preferred_job_titles_completed = $8,
            completed = $9,
            updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(t.user_id)
    .bind(t.personal_infos_completed)
    .bind(t.professional_summaries_completed)
    .bind(t.work_experiences_completed)
    .bind(t.educations_completed)
    .bind(t.certificates_completed)
    .bind(t.languages_completed)
    .bind(t.preferred_job_titles_completed)
    .bind(t.completed)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

async fn update_profile<'e, E>(executor: E, profile: &Profile) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE seeker_profiles SET document = $2, updated_at = NOW() WHERE user_id = $1",
    )
    .bind(profile.user_id)
    .bind(Json(profile))
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// LIMIT/OFFSET binding. Values past `i64::MAX` clamp instead of wrapping
/// negative, which Postgres would reject.
fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn selection_not_found(job_id: &str) -> StoreError {
    StoreError::NotFound(format!("Selection of job {job_id}"))
}

fn profile_not_found(user_id: Uuid) -> StoreError {
    StoreError::NotFound(format!("Profile for user {user_id}"))
}

fn timeline_not_found(user_id: Uuid) -> StoreError {
    StoreError::NotFound(format!("Timeline for user {user_id}"))
}

#[async_trait]
impl SeekerStore for PgStore {
    async fn create_seeker(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO seeker_profiles (user_id, document) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(profile.user_id)
        .bind(Json(profile))
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 || insert_timeline(&mut *tx, timeline).await? == 0 {
            return Err(StoreError::Conflict(format!(
                "Seeker {}",
                profile.user_id
            )));
        }

        tx.commit().await?;
        info!("Provisioned profile and timeline for user {}", profile.user_id);
        Ok(())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        sqlx::query_scalar::<_, Json<Profile>>(
            "SELECT document FROM seeker_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|Json(profile)| profile)
        .ok_or_else(|| profile_not_found(user_id))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        if update_profile(&self.pool, profile).await? == 0 {
            return Err(profile_not_found(profile.user_id));
        }
        Ok(())
    }

    async fn fetch_timeline(&self, user_id: Uuid) -> Result<ProgressTimeline, StoreError> {
        let sql = format!("SELECT {TIMELINE_COLUMNS} FROM entry_timelines WHERE user_id = $1");
        sqlx::query_as::<_, ProgressTimeline>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| timeline_not_found(user_id))
    }

    async fn save_timeline(&self, timeline: &ProgressTimeline) -> Result<(), StoreError> {
        if update_timeline(&self.pool, timeline).await? == 0 {
            return Err(timeline_not_found(timeline.user_id));
        }
        Ok(())
    }

    async fn commit_step(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        if update_profile(&mut *tx, profile).await? == 0 {
            return Err(profile_not_found(profile.user_id));
        }
        if update_timeline(&mut *tx, timeline).await? == 0 {
            return Err(timeline_not_found(timeline.user_id));
        }

        tx.commit().await?;
        debug!("Committed onboarding step for user {}", profile.user_id);
        Ok(())
    }
}

/// Escapes LIKE wildcards so titles match literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl JobCorpus for PgStore {
    async fn list_jobs(&self, title_substrings: &[String]) -> Result<Vec<Job>, StoreError> {
        if title_substrings.is_empty() {
            return Ok(Vec::new());
        }
        let patterns: Vec<String> = title_substrings
            .iter()
            .map(|t| format!("%{}%", escape_like(t)))
            .collect();

        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE title ILIKE ANY($1) ORDER BY ingested_at, job_id"
        );
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(patterns)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1");
        sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {job_id}")))
    }

    async fn get_job_link(&self, job_id: &str) -> Result<JobLink, StoreError> {
        sqlx::query_as::<_, JobLink>("SELECT job_id, job_link, source FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Job {job_id}")))
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn select_job(&self, selection: &SelectedJob) -> Result<(), StoreError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO selected_jobs
                (user_id, job_id, title, company, location, match_score,
                 cv_generated, cover_letter_generated, view_link, selected_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, job_id) DO NOTHING
            "#,
        )
        .bind(selection.user_id)
        .bind(&selection.job_id)
        .bind(&selection.title)
        .bind(&selection.company)
        .bind(&selection.location)
        .bind(selection.match_score)
        .bind(selection.cv_generated)
        .bind(selection.cover_letter_generated)
        .bind(selection.view_link)
        .bind(selection.selected_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::Conflict(format!(
                "Selection of job {}",
                selection.job_id
            )));
        }
        Ok(())
    }

    async fn get_selection(&self, user_id: Uuid, job_id: &str) -> Result<SelectedJob, StoreError> {
        let sql = format!(
            "SELECT {SELECTED_COLUMNS} FROM selected_jobs WHERE user_id = $1 AND job_id = $2"
        );
        sqlx::query_as::<_, SelectedJob>(&sql)
            .bind(user_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| selection_not_found(job_id))
    }

    async fn list_selected(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<SelectedJob>, usize), StoreError> {
        let sql = format!(
            "SELECT {SELECTED_COLUMNS} FROM selected_jobs WHERE user_id = $1 \
             ORDER BY selected_at, job_id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, SelectedJob>(&sql)
            .bind(user_id)
            .bind(sql_bound(limit))
            .bind(sql_bound(offset))
            .fetch_all(&self.pool)
            .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM selected_jobs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((rows, total.max(0) as usize))
    }

    async fn mark_document_generated(
        &self,
        user_id: Uuid,
        job_id: &str,
        document: GeneratedDocument,
    ) -> Result<(), StoreError> {
        let sql = match document {
            GeneratedDocument::CoverLetter => {
                "UPDATE selected_jobs SET cover_letter_generated = TRUE WHERE user_id = $1 AND job_id = $2"
            }
            GeneratedDocument::Cv => {
                "UPDATE selected_jobs SET cv_generated = TRUE WHERE user_id = $1 AND job_id = $2"
            }
        };
        let updated = sqlx::query(sql)
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(selection_not_found(job_id));
        }
        Ok(())
    }

    async fn mark_link_viewed(&self, user_id: Uuid, job_id: &str) -> Result<(), StoreError> {
        let updated = sqlx::query(
            "UPDATE selected_jobs SET view_link = TRUE WHERE user_id = $1 AND job_id = $2",
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(selection_not_found(job_id));
        }
        Ok(())
    }

    async fn save_job(&self, saved: &SavedJob) -> Result<(), StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO saved_jobs (user_id, job_id, source, saved_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, job_id) DO NOTHING",
        )
        .bind(saved.user_id)
        .bind(&saved.job_id)
        .bind(&saved.source)
        .bind(saved.saved_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::Conflict(format!("Saved job {}", saved.job_id)));
        }
        Ok(())
    }

    async fn list_saved(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, usize), StoreError> {
        let sql = format!(
            "SELECT {SAVED_JOB_COLUMNS} FROM saved_jobs s JOIN jobs j ON j.job_id = s.job_id \
             WHERE s.user_id = $1 ORDER BY s.saved_at, s.job_id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Job>(&sql)
            .bind(user_id)
            .bind(sql_bound(limit))
            .bind(sql_bound(offset))
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM saved_jobs s JOIN jobs j ON j.job_id = s.job_id \
             WHERE s.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total.max(0) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("c_level 100%"), "c\\_level 100\\%");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_sql_bound_never_goes_negative() {
        assert_eq!(sql_bound(0), 0);
        assert_eq!(sql_bound(40), 40);
        assert_eq!(sql_bound(usize::MAX), i64::MAX);
    }
}
