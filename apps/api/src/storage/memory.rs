//! In-memory storage for tests. Same contracts as the Postgres store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::job::{Job, JobLink, SavedJob, SelectedJob};
use crate::models::profile::Profile;
use crate::models::timeline::ProgressTimeline;
use crate::storage::{
    ApplicationStore, GeneratedDocument, JobCorpus, SeekerStore, StoreError,
};

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, Profile>,
    timelines: HashMap<Uuid, ProgressTimeline>,
    jobs: Vec<Job>,
    links: HashMap<String, JobLink>,
    selections: Vec<SelectedJob>,
    saved: Vec<SavedJob>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                jobs,
                ..Inner::default()
            })),
        }
    }

    /// Attaches an apply link to a job already in the corpus.
    pub async fn set_job_link(&self, link: JobLink) {
        self.inner
            .write()
            .await
            .links
            .insert(link.job_id.clone(), link);
    }
}

#[async_trait]
impl SeekerStore for MemoryStore {
    async fn create_seeker(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.profiles.contains_key(&profile.user_id) {
            return Err(StoreError::Conflict(format!("Seeker {}", profile.user_id)));
        }
        inner.profiles.insert(profile.user_id, profile.clone());
        inner.timelines.insert(timeline.user_id, timeline.clone());
        Ok(())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        self.inner
            .read()
            .await
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile for user {user_id}")))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.profiles.get_mut(&profile.user_id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "Profile for user {}",
                profile.user_id
            ))),
        }
    }

    async fn fetch_timeline(&self, user_id: Uuid) -> Result<ProgressTimeline, StoreError> {
        self.inner
            .read()
            .await
            .timelines
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Timeline for user {user_id}")))
    }

    async fn save_timeline(&self, timeline: &ProgressTimeline) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.timelines.get_mut(&timeline.user_id) {
            Some(stored) => {
                *stored = timeline.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "Timeline for user {}",
                timeline.user_id
            ))),
        }
    }

    async fn commit_step(
        &self,
        profile: &Profile,
        timeline: &ProgressTimeline,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.profiles.contains_key(&profile.user_id) {
            return Err(StoreError::NotFound(format!(
                "Profile for user {}",
                profile.user_id
            )));
        }
        if !inner.timelines.contains_key(&timeline.user_id) {
            return Err(StoreError::NotFound(format!(
                "Timeline for user {}",
                timeline.user_id
            )));
        }
        inner.profiles.insert(profile.user_id, profile.clone());
        inner.timelines.insert(timeline.user_id, timeline.clone());
        Ok(())
    }
}

#[async_trait]
impl JobCorpus for MemoryStore {
    async fn list_jobs(&self, title_substrings: &[String]) -> Result<Vec<Job>, StoreError> {
        let needles: Vec<String> = title_substrings.iter().map(|t| t.to_lowercase()).collect();
        Ok(self
            .inner
            .read()
            .await
            .jobs
            .iter()
            .filter(|job| {
                let title = job.title.to_lowercase();
                needles.iter().any(|n| title.contains(n))
            })
            .cloned()
            .collect())
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, StoreError> {
        self.inner
            .read()
            .await
            .jobs
            .iter()
            .find(|job| job.job_id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Job {job_id}")))
    }

    async fn get_job_link(&self, job_id: &str) -> Result<JobLink, StoreError> {
        let inner = self.inner.read().await;
        if !inner.jobs.iter().any(|job| job.job_id == job_id) {
            return Err(StoreError::NotFound(format!("Job {job_id}")));
        }
        Ok(inner.links.get(job_id).cloned().unwrap_or_else(|| JobLink {
            job_id: job_id.to_string(),
            job_link: String::new(),
            source: String::new(),
        }))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn select_job(&self, selection: &SelectedJob) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .selections
            .iter()
            .any(|s| s.user_id == selection.user_id && s.job_id == selection.job_id)
        {
            return Err(StoreError::Conflict(format!(
                "Selection of job {}",
                selection.job_id
            )));
        }
        inner.selections.push(selection.clone());
        Ok(())
    }

    async fn get_selection(&self, user_id: Uuid, job_id: &str) -> Result<SelectedJob, StoreError> {
        self.inner
            .read()
            .await
            .selections
            .iter()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Selection of job {job_id}")))
    }

    async fn list_selected(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<SelectedJob>, usize), StoreError> {
        let inner = self.inner.read().await;
        let mine: Vec<&SelectedJob> = inner
            .selections
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        let total = mine.len();
        let page = mine.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((page, total))
    }

    async fn mark_document_generated(
        &self,
        user_id: Uuid,
        job_id: &str,
        document: GeneratedDocument,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let selection = inner
            .selections
            .iter_mut()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .ok_or_else(|| StoreError::NotFound(format!("Selection of job {job_id}")))?;
        match document {
            GeneratedDocument::CoverLetter => selection.cover_letter_generated = true,
            GeneratedDocument::Cv => selection.cv_generated = true,
        }
        Ok(())
    }

    async fn mark_link_viewed(&self, user_id: Uuid, job_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let selection = inner
            .selections
            .iter_mut()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .ok_or_else(|| StoreError::NotFound(format!("Selection of job {job_id}")))?;
        selection.view_link = true;
        Ok(())
    }

    async fn save_job(&self, saved: &SavedJob) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .saved
            .iter()
            .any(|s| s.user_id == saved.user_id && s.job_id == saved.job_id)
        {
            return Err(StoreError::Conflict(format!("Saved job {}", saved.job_id)));
        }
        inner.saved.push(saved.clone());
        Ok(())
    }

    async fn list_saved(
        &self,
        user_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, usize), StoreError> {
        let inner = self.inner.read().await;
        let mine: Vec<&Job> = inner
            .saved
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| inner.jobs.iter().find(|job| job.job_id == s.job_id))
            .collect();
        let total = mine.len();
        let page = mine.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((page, total))
    }
}
