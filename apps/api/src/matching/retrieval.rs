use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::Job;
use crate::models::profile::Profile;

/// A corpus job annotated with the seeker's match score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: Job,
    pub match_score: f64,
}

/// Non-blank preferred titles in primary, secondary, tertiary order.
pub fn preferred_titles(profile: &Profile) -> Vec<String> {
    let Some(titles) = &profile.preferred_titles else {
        return Vec::new();
    };
    [
        Some(titles.primary.as_str()),
        titles.secondary.as_deref(),
        titles.tertiary.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(String::from)
    .collect()
}

/// Like [`preferred_titles`], but an empty result is `NoPreferenceSet`.
pub fn require_preferred_titles(profile: &Profile) -> Result<Vec<String>, AppError> {
    let titles = preferred_titles(profile);
    if titles.is_empty() {
        return Err(AppError::NoPreferenceSet);
    }
    Ok(titles)
}

/// Case-insensitive substring match against any of the titles.
pub fn title_matches(job_title: &str, titles: &[String]) -> bool {
    let job_title = job_title.to_lowercase();
    titles
        .iter()
        .any(|t| job_title.contains(&t.to_lowercase()))
}

/// Keeps the jobs whose title matches any preferred title, in corpus order,
/// and scores each one. No ranking.
pub fn filter_jobs<F>(titles: &[String], corpus: Vec<Job>, mut score: F) -> Result<Vec<ScoredJob>, AppError>
where
    F: FnMut(&Job) -> Result<f64, AppError>,
{
    if titles.is_empty() {
        return Err(AppError::NoPreferenceSet);
    }

    corpus
        .into_iter()
        .filter(|job| title_matches(&job.title, titles))
        .map(|job| {
            let match_score = score(&job)?;
            Ok(ScoredJob { job, match_score })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scoring::{CosineMatchScorer, MatchScorer};
    use crate::matching::text::job_text;
    use crate::models::profile::PreferredTitles;
    use uuid::Uuid;

    fn job(id: &str, title: &str) -> Job {
        Job {
            job_id: id.into(),
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            posted_date: None,
            job_type: "Full-time".into(),
            skills: "Go".into(),
            description: "Build things".into(),
        }
    }

    fn corpus() -> Vec<Job> {
        vec![
            job("1", "Software Engineer"),
            job("2", "DevOps Engineer"),
            job("3", "Product Manager"),
        ]
    }

    #[test]
    fn test_engineer_matches_two_jobs_in_order() {
        let scorer = CosineMatchScorer::default();
        let titles = vec!["Engineer".to_string()];
        let result = filter_jobs(&titles, corpus(), |job| {
            Ok(scorer.score("Go engineer", &job_text(job))?)
        })
        .unwrap();

        let ids: Vec<&str> = result.iter().map(|s| s.job.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(result
            .iter()
            .all(|s| s.match_score > 0.0 && s.match_score < 100.0));
    }

    #[test]
    fn test_no_titles_is_no_preference_set() {
        let mut calls = 0;
        let result = filter_jobs(&[], corpus(), |_| {
            calls += 1;
            Ok(50.0)
        });
        assert!(matches!(result, Err(AppError::NoPreferenceSet)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_matching_is_or_across_titles() {
        let titles = vec!["manager".to_string(), "DEVOPS".to_string()];
        let result = filter_jobs(&titles, corpus(), |_| Ok(1.0)).unwrap();
        let ids: Vec<&str> = result.iter().map(|s| s.job.job_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_score_error_propagates() {
        let titles = vec!["Engineer".to_string()];
        let result = filter_jobs(&titles, corpus(), |_| {
            Err(AppError::EmptyInput("Job text has no tokens to score".into()))
        });
        assert!(matches!(result, Err(AppError::EmptyInput(_))));
    }

    #[test]
    fn test_preferred_titles_skip_blanks() {
        let mut profile = Profile::empty(Uuid::nil());
        assert!(preferred_titles(&profile).is_empty());
        assert!(matches!(
            require_preferred_titles(&profile),
            Err(AppError::NoPreferenceSet)
        ));

        profile.preferred_titles = Some(PreferredTitles {
            primary: "Engineer".into(),
            secondary: Some(" ".into()),
            tertiary: Some("SRE".into()),
        });
        assert_eq!(preferred_titles(&profile), vec!["Engineer", "SRE"]);
    }
}
