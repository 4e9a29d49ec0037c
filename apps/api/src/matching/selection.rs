//! Job listing, per-job scores, selected and saved jobs for a seeker.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::cache::ScoreScope;
use crate::matching::retrieval::{filter_jobs, require_preferred_titles, ScoredJob};
use crate::matching::text::{job_text, profile_text};
use crate::models::job::{Job, JobLink, SavedJob, SelectedJob};
use crate::pagination::{Page, PageMeta};
use crate::state::AppState;
use crate::storage::StoreError;

/// Scores jobs for one seeker, reading the cache first and writing back any
/// score it had to compute. Cache failures are logged and skipped.
///
/// Entries are scoped to the current profile text, so a profile edit never
/// serves a score computed from the old profile.
struct ScoringSession<'a> {
    state: &'a AppState,
    scope: ScoreScope,
    profile_text: String,
    cached: HashMap<String, f64>,
    fresh: Vec<(String, f64)>,
}

impl<'a> ScoringSession<'a> {
    async fn open(state: &'a AppState, user_id: Uuid, profile_text: String, jobs: &[Job]) -> Self {
        let scope = ScoreScope::new(user_id, &profile_text);
        let ids: Vec<String> = jobs.iter().map(|j| j.job_id.clone()).collect();
        let cached = match state.score_cache.get_scores(&scope, &ids).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Score cache read failed for {user_id}: {e}");
                HashMap::new()
            }
        };
        Self {
            state,
            scope,
            profile_text,
            cached,
            fresh: Vec::new(),
        }
    }

    fn score(&mut self, job: &Job) -> Result<f64, AppError> {
        if let Some(score) = self.cached.get(&job.job_id) {
            return Ok(*score);
        }
        let score = self.state.scorer.score(&self.profile_text, &job_text(job))?;
        self.fresh.push((job.job_id.clone(), score));
        Ok(score)
    }

    async fn close(self) {
        if self.fresh.is_empty() {
            return;
        }
        if let Err(e) = self
            .state
            .score_cache
            .put_scores(&self.scope, &self.fresh)
            .await
        {
            warn!("Score cache write failed for {}: {e}", self.scope.user_id);
        }
    }
}

/// Jobs matching the seeker's preferred titles, scored, then paged.
pub async fn list_matching_jobs(
    state: &AppState,
    user_id: Uuid,
    page: Page,
) -> Result<(Vec<ScoredJob>, PageMeta), AppError> {
    let profile = state.seekers.fetch_profile(user_id).await?;
    let titles = require_preferred_titles(&profile)?;
    let corpus = state.jobs.list_jobs(&titles).await?;

    let mut session = ScoringSession::open(state, user_id, profile_text(&profile), &corpus).await;
    let scored = filter_jobs(&titles, corpus, |job| session.score(job))?;
    session.close().await;

    info!(
        "Retrieved {} matching jobs for seeker {user_id}",
        scored.len()
    );
    Ok(page.slice(scored))
}

pub async fn match_score_for_job(
    state: &AppState,
    user_id: Uuid,
    job_id: &str,
) -> Result<ScoredJob, AppError> {
    let profile = state.seekers.fetch_profile(user_id).await?;
    let job = state.jobs.get_job(job_id).await?;

    let mut session =
        ScoringSession::open(state, user_id, profile_text(&profile), std::slice::from_ref(&job))
            .await;
    let match_score = session.score(&job)?;
    session.close().await;

    Ok(ScoredJob { job, match_score })
}

fn require_job_id(job_id: &str) -> Result<(), AppError> {
    if job_id.trim().is_empty() {
        return Err(AppError::Validation("job_id is required".to_string()));
    }
    Ok(())
}

pub async fn select_job(
    state: &AppState,
    user_id: Uuid,
    job_id: &str,
) -> Result<SelectedJob, AppError> {
    require_job_id(job_id)?;
    let ScoredJob { job, match_score } = match_score_for_job(state, user_id, job_id).await?;

    let selection = SelectedJob {
        user_id,
        job_id: job.job_id,
        title: job.title,
        company: job.company,
        location: job.location,
        match_score,
        cv_generated: false,
        cover_letter_generated: false,
        view_link: false,
        selected_at: Utc::now(),
    };
    state.applications.select_job(&selection).await?;

    info!("Seeker {user_id} selected job {}", selection.job_id);
    Ok(selection)
}

pub async fn list_selected_jobs(
    state: &AppState,
    user_id: Uuid,
    page: Page,
) -> Result<(Vec<SelectedJob>, PageMeta), AppError> {
    let (items, total) = state
        .applications
        .list_selected(user_id, page.offset(), page.limit)
        .await?;
    Ok((items, page.meta(total)))
}

/// Bookmarks a corpus job. Saving the same job twice is a conflict.
pub async fn save_job(
    state: &AppState,
    user_id: Uuid,
    job_id: &str,
    source: Option<String>,
) -> Result<SavedJob, AppError> {
    require_job_id(job_id)?;
    state.seekers.fetch_profile(user_id).await?;
    let job = state.jobs.get_job(job_id).await?;

    let saved = SavedJob {
        user_id,
        job_id: job.job_id,
        source: source.map(|s| s.trim().to_string()).unwrap_or_default(),
        saved_at: Utc::now(),
    };
    state.applications.save_job(&saved).await?;

    info!("Seeker {user_id} saved job {}", saved.job_id);
    Ok(saved)
}

/// Saved jobs in save order, scored against the current profile.
pub async fn list_saved_jobs(
    state: &AppState,
    user_id: Uuid,
    page: Page,
) -> Result<(Vec<ScoredJob>, PageMeta), AppError> {
    let profile = state.seekers.fetch_profile(user_id).await?;
    let (jobs, total) = state
        .applications
        .list_saved(user_id, page.offset(), page.limit)
        .await?;

    let mut session = ScoringSession::open(state, user_id, profile_text(&profile), &jobs).await;
    let mut scored = Vec::with_capacity(jobs.len());
    for job in jobs {
        let match_score = session.score(&job)?;
        scored.push(ScoredJob { job, match_score });
    }
    session.close().await;

    Ok((scored, page.meta(total)))
}

/// Apply link for a job the seeker has selected. Only selected jobs expose
/// their link; fetching it flags the selection.
pub async fn job_link(state: &AppState, user_id: Uuid, job_id: &str) -> Result<JobLink, AppError> {
    require_job_id(job_id)?;
    match state.applications.get_selection(user_id, job_id).await {
        Ok(_) => {}
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::Forbidden(format!(
                "Job {job_id} has not been selected"
            )))
        }
        Err(e) => return Err(e.into()),
    }

    let link = state.jobs.get_job_link(job_id).await?;
    if let Err(e) = state.applications.mark_link_viewed(user_id, job_id).await {
        warn!("Failed to flag link view of job {job_id} for {user_id}: {e}");
    }
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::cache::ScoreCache;
    use crate::models::profile::{PreferredTitles, ProfessionalSummary, Profile};
    use crate::models::timeline::{ProgressTimeline, RequiredSteps};
    use crate::onboarding::mutators::{ProfessionalSummaryInput, ProfileUpdate};
    use crate::onboarding::service::record_step;
    use crate::pagination::PageQuery;
    use crate::state::testing::TestHarness;
    use crate::storage::{ApplicationStore, SeekerStore};

    fn job(id: &str, title: &str, description: &str) -> Job {
        Job {
            job_id: id.into(),
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            posted_date: None,
            job_type: "Full-time".into(),
            skills: "Go".into(),
            description: description.into(),
        }
    }

    fn corpus() -> Vec<Job> {
        vec![
            job("1", "Software Engineer", "Go and Kubernetes engineer needed"),
            job("2", "DevOps Engineer", "Terraform pipelines"),
            job("3", "Product Manager", "Roadmaps"),
        ]
    }

    async fn seed(harness: &TestHarness, titles: Option<&str>) -> Uuid {
        let user_id = Uuid::new_v4();
        let mut profile = Profile::empty(user_id);
        profile.professional_summary = Some(ProfessionalSummary {
            about: "Backend".into(),
            skills: vec!["Go".into(), "Kubernetes".into()],
            annual_income: 0.0,
        });
        profile.preferred_titles = titles.map(|t| PreferredTitles {
            primary: t.into(),
            secondary: None,
            tertiary: None,
        });
        harness
            .store
            .create_seeker(
                &profile,
                &ProgressTimeline::new(user_id, &RequiredSteps::default()),
            )
            .await
            .unwrap();
        user_id
    }

    async fn current_scope(harness: &TestHarness, user_id: Uuid) -> ScoreScope {
        let profile = harness.store.fetch_profile(user_id).await.unwrap();
        ScoreScope::new(user_id, &profile_text(&profile))
    }

    fn first_page() -> Page {
        PageQuery::default().resolve()
    }

    #[tokio::test]
    async fn test_listing_filters_scores_and_caches() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, Some("Engineer")).await;

        let (jobs, meta) = list_matching_jobs(&state, user_id, first_page())
            .await
            .unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.job.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(meta.total, 2);

        let scope = current_scope(&harness, user_id).await;
        let cached = harness
            .cache
            .get_scores(&scope, &["1".to_string(), "2".to_string()])
            .await
            .unwrap();
        assert_eq!(cached["1"], jobs[0].match_score);
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_cached_score_is_served() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, Some("Software")).await;
        let scope = current_scope(&harness, user_id).await;
        harness
            .cache
            .put_scores(&scope, &[("1".to_string(), 12.5)])
            .await
            .unwrap();

        let (jobs, _) = list_matching_jobs(&state, user_id, first_page())
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].match_score, 12.5);
    }

    #[tokio::test]
    async fn test_profile_edit_rescores_listed_jobs() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, Some("Engineer")).await;

        let (before, _) = list_matching_jobs(&state, user_id, first_page())
            .await
            .unwrap();

        let (profile, _) = record_step(
            state.seekers.as_ref(),
            user_id,
            ProfileUpdate::ProfessionalSummary(ProfessionalSummaryInput {
                about: "Infrastructure".into(),
                skills: vec!["Terraform".into(), "pipelines".into()],
                annual_income: Some(90_000.0),
            }),
        )
        .await
        .unwrap();

        let (after, _) = list_matching_jobs(&state, user_id, first_page())
            .await
            .unwrap();
        let devops = &corpus()[1];
        let fresh = state
            .scorer
            .score(&profile_text(&profile), &job_text(devops))
            .unwrap();
        assert_eq!(after[1].job.job_id, "2");
        assert_eq!(after[1].match_score, fresh);
        assert_ne!(after[1].match_score, before[1].match_score);

        let selection = select_job(&state, user_id, "2").await.unwrap();
        assert_eq!(selection.match_score, fresh);
    }

    #[tokio::test]
    async fn test_listing_without_titles() {
        let harness = TestHarness::with_jobs(corpus());
        let user_id = seed(&harness, None).await;
        let err = list_matching_jobs(&harness.state(), user_id, first_page())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoPreferenceSet));
    }

    #[tokio::test]
    async fn test_select_twice_conflicts() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, Some("Engineer")).await;

        let selection = select_job(&state, user_id, "1").await.unwrap();
        assert!(selection.match_score > 50.0);

        let err = select_job(&state, user_id, "1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let (selected, meta) = list_selected_jobs(&state, user_id, first_page())
            .await
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(meta.total, 1);
    }

    #[tokio::test]
    async fn test_select_unknown_job() {
        let harness = TestHarness::with_jobs(corpus());
        let user_id = seed(&harness, Some("Engineer")).await;
        let err = select_job(&harness.state(), user_id, "404")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_saved_jobs_in_save_order() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, None).await;

        let saved = save_job(&state, user_id, "3", Some(" listing ".into()))
            .await
            .unwrap();
        assert_eq!(saved.source, "listing");
        save_job(&state, user_id, "1", None).await.unwrap();

        let err = save_job(&state, user_id, "3", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = save_job(&state, user_id, "404", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let (jobs, meta) = list_saved_jobs(&state, user_id, first_page())
            .await
            .unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.job.job_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(meta.total, 2);
        let single = match_score_for_job(&state, user_id, "3").await.unwrap();
        assert_eq!(jobs[0].match_score, single.match_score);
    }

    #[tokio::test]
    async fn test_saved_jobs_past_last_page() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, None).await;
        save_job(&state, user_id, "1", None).await.unwrap();

        let page = PageQuery {
            page: Some(usize::MAX.to_string()),
            limit: None,
        }
        .resolve();
        let (jobs, meta) = list_saved_jobs(&state, user_id, page).await.unwrap();
        assert!(jobs.is_empty());
        assert_eq!(meta.total, 1);
    }

    #[tokio::test]
    async fn test_link_requires_selection() {
        let harness = TestHarness::with_jobs(corpus());
        let state = harness.state();
        let user_id = seed(&harness, Some("Engineer")).await;
        harness
            .store
            .set_job_link(JobLink {
                job_id: "1".into(),
                job_link: "https://jobs.example.com/1".into(),
                source: "linkedin".into(),
            })
            .await;

        let err = job_link(&state, user_id, "1").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        select_job(&state, user_id, "1").await.unwrap();
        let link = job_link(&state, user_id, "1").await.unwrap();
        assert_eq!(link.job_link, "https://jobs.example.com/1");
        assert_eq!(link.source, "linkedin");

        let selection = harness.store.get_selection(user_id, "1").await.unwrap();
        assert!(selection.view_link);
    }
}
