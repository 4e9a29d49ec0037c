//! Match scoring: how well a seeker's profile text fits a job posting.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>` so the algorithm can be swapped
//! without touching the retrieval filter or the handlers.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("{0} text has no tokens to score")]
    EmptyInput(&'static str),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait MatchScorer: Send + Sync {
    /// Score in `[0, 100]`. Errors if either side tokenizes to nothing.
    fn score(&self, profile_text: &str, job_text: &str) -> Result<f64, MatchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// CosineMatchScorer
// ────────────────────────────────────────────────────────────────────────────

/// Bag-of-words scorer.
///
/// 1. Lowercase, split on whitespace. No stemming, no stopwords.
/// 2. Term frequency = token count / total tokens.
/// 3. Cosine similarity of the two frequency vectors.
/// 4. `100 / (1 + e^(-cos * gain))`, clamped to `[0, 100]`.
///
/// Disjoint texts score exactly 50; identical texts approach 100.
#[derive(Debug, Clone, Copy)]
pub struct CosineMatchScorer {
    pub gain: f64,
}

impl Default for CosineMatchScorer {
    fn default() -> Self {
        Self { gain: 10.0 }
    }
}

impl MatchScorer for CosineMatchScorer {
    fn score(&self, profile_text: &str, job_text: &str) -> Result<f64, MatchError> {
        let profile_tokens = tokenize(profile_text);
        let job_tokens = tokenize(job_text);
        let profile_tf =
            term_frequencies(&profile_tokens).ok_or(MatchError::EmptyInput("Profile"))?;
        let job_tf = term_frequencies(&job_tokens).ok_or(MatchError::EmptyInput("Job"))?;

        let cosine = cosine_similarity(&profile_tf, &job_tf);
        Ok(logistic_score(cosine, self.gain))
    }
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// `None` for an empty token list. Ordered map so that both argument orders
/// of the dot product sum the same terms in the same order.
pub fn term_frequencies(tokens: &[String]) -> Option<BTreeMap<&str, f64>> {
    if tokens.is_empty() {
        return None;
    }
    let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    for value in counts.values_mut() {
        *value /= total;
    }
    Some(counts)
}

pub fn cosine_similarity(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub fn logistic_score(cosine: f64, gain: f64) -> f64 {
    let score = 100.0 / (1.0 + (-cosine * gain).exp());
    score.clamp(0.0, 100.0)
}
