//! Match score cache keyed by (seeker, profile revision, job).
//!
//! The profile revision is a digest of the profile text the scores were
//! computed from. Any profile edit changes it, so older entries are never
//! read again and simply expire.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::Client as RedisClient;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::storage::StoreError;

/// Whose scores, computed against which profile text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreScope {
    pub user_id: Uuid,
    pub fingerprint: String,
}

impl ScoreScope {
    pub fn new(user_id: Uuid, profile_text: &str) -> Self {
        let digest = Sha256::digest(profile_text.as_bytes());
        let fingerprint = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        Self {
            user_id,
            fingerprint,
        }
    }

    pub fn key(&self, job_id: &str) -> String {
        format!("match_score:{}:{}:{job_id}", self.user_id, self.fingerprint)
    }
}

#[async_trait]
pub trait ScoreCache: Send + Sync {
    /// Cached scores for whichever of `job_ids` are present.
    async fn get_scores(
        &self,
        scope: &ScoreScope,
        job_ids: &[String],
    ) -> Result<HashMap<String, f64>, StoreError>;

    async fn put_scores(
        &self,
        scope: &ScoreScope,
        scores: &[(String, f64)],
    ) -> Result<(), StoreError>;
}

pub struct RedisScoreCache {
    client: RedisClient,
    ttl_secs: u64,
}

impl RedisScoreCache {
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl ScoreCache for RedisScoreCache {
    async fn get_scores(
        &self,
        scope: &ScoreScope,
        job_ids: &[String],
    ) -> Result<HashMap<String, f64>, StoreError> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let keys: Vec<String> = job_ids.iter().map(|id| scope.key(id)).collect();

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let values: Vec<Option<f64>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let hits: HashMap<String, f64> = job_ids
            .iter()
            .zip(values)
            .filter_map(|(id, value)| value.map(|score| (id.clone(), score)))
            .collect();
        debug!(
            "Score cache: {}/{} hits for {}",
            hits.len(),
            job_ids.len(),
            scope.user_id
        );
        Ok(hits)
    }

    async fn put_scores(
        &self,
        scope: &ScoreScope,
        scores: &[(String, f64)],
    ) -> Result<(), StoreError> {
        if scores.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for (job_id, score) in scores {
            pipe.cmd("SET")
                .arg(scope.key(job_id))
                .arg(*score)
                .arg("EX")
                .arg(self.ttl_secs)
                .ignore();
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        pipe.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryScoreCache {
    pub entries: tokio::sync::RwLock<HashMap<String, f64>>,
}

#[cfg(test)]
#[async_trait]
impl ScoreCache for MemoryScoreCache {
    async fn get_scores(
        &self,
        scope: &ScoreScope,
        job_ids: &[String],
    ) -> Result<HashMap<String, f64>, StoreError> {
        let entries = self.entries.read().await;
        Ok(job_ids
            .iter()
            .filter_map(|id| {
                entries
                    .get(&scope.key(id))
                    .map(|score| (id.clone(), *score))
            })
            .collect())
    }

    async fn put_scores(
        &self,
        scope: &ScoreScope,
        scores: &[(String, f64)],
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        for (job_id, score) in scores {
            entries.insert(scope.key(job_id), *score);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let scope = ScoreScope {
            user_id: Uuid::nil(),
            fingerprint: "0123456789abcdef".into(),
        };
        assert_eq!(
            scope.key("job-42"),
            "match_score:00000000-0000-0000-0000-000000000000:0123456789abcdef:job-42"
        );
    }

    #[test]
    fn test_fingerprint_follows_profile_text() {
        let user = Uuid::new_v4();
        let before = ScoreScope::new(user, "Skills: Go");
        assert_eq!(before, ScoreScope::new(user, "Skills: Go"));
        assert_eq!(before.fingerprint.len(), 16);
        assert_ne!(before, ScoreScope::new(user, "Skills: Go, Kubernetes"));
    }

    #[tokio::test]
    async fn test_memory_cache_is_scoped() {
        let cache = MemoryScoreCache::default();
        let alice = ScoreScope::new(Uuid::new_v4(), "Skills: Go");
        let bob = ScoreScope::new(Uuid::new_v4(), "Skills: Go");
        let alice_edited = ScoreScope::new(alice.user_id, "Skills: Rust");
        cache
            .put_scores(&alice, &[("j1".to_string(), 72.5)])
            .await
            .unwrap();

        let ids = vec!["j1".to_string(), "j2".to_string()];
        let hits = cache.get_scores(&alice, &ids).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits["j1"], 72.5);
        assert!(cache.get_scores(&bob, &ids).await.unwrap().is_empty());
        assert!(cache.get_scores(&alice_edited, &ids).await.unwrap().is_empty());
    }
}
