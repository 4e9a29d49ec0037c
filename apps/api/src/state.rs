use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::matching::cache::ScoreCache;
use crate::matching::scoring::MatchScorer;
use crate::media::MediaStore;
use crate::storage::{ApplicationStore, JobCorpus, SeekerStore};

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator sits behind a trait so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub seekers: Arc<dyn SeekerStore>,
    pub jobs: Arc<dyn JobCorpus>,
    pub applications: Arc<dyn ApplicationStore>,
    pub media: Arc<dyn MediaStore>,
    pub score_cache: Arc<dyn ScoreCache>,
    /// Default: CosineMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}

#[cfg(test)]
pub mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::AppState;
    use crate::config::Config;
    use crate::llm_client::{Completion, LlmError, TextGenerator};
    use crate::matching::cache::MemoryScoreCache;
    use crate::matching::scoring::CosineMatchScorer;
    use crate::media::MemoryMediaStore;
    use crate::models::job::Job;
    use crate::storage::memory::MemoryStore;

    /// Echoes a fixed document and records every prompt it was given.
    #[derive(Default)]
    pub struct CannedGenerator {
        pub prompts: tokio::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<Completion, LlmError> {
            self.prompts.lock().await.push(prompt.to_string());
            Ok(Completion {
                model: "test-model".to_string(),
                text: "Dear hiring team, ...".to_string(),
            })
        }
    }

    /// In-memory collaborators plus handles to inspect them.
    #[derive(Default)]
    pub struct TestHarness {
        pub store: MemoryStore,
        pub cache: Arc<MemoryScoreCache>,
        pub media: Arc<MemoryMediaStore>,
        pub llm: Arc<CannedGenerator>,
    }

    impl TestHarness {
        pub fn with_jobs(jobs: Vec<Job>) -> Self {
            Self {
                store: MemoryStore::with_jobs(jobs),
                ..Self::default()
            }
        }

        pub fn state(&self) -> AppState {
            AppState {
                seekers: Arc::new(self.store.clone()),
                jobs: Arc::new(self.store.clone()),
                applications: Arc::new(self.store.clone()),
                media: self.media.clone(),
                score_cache: self.cache.clone(),
                scorer: Arc::new(CosineMatchScorer::default()),
                llm: self.llm.clone(),
                config: Config::for_tests(),
            }
        }
    }
}
