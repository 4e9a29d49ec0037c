use anyhow::{Context, Result};

use crate::models::timeline::RequiredSteps;

const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Model pool for document generation, used round-robin.
    pub llm_models: Vec<String>,
    pub match_score_ttl_secs: u64,
    pub required_steps: RequiredSteps,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let required_steps = RequiredSteps {
            certificates: parse_flag(optional_env("REQUIRE_CERTIFICATES").as_deref())
                .context("REQUIRE_CERTIFICATES must be true or false")?,
            languages: parse_flag(optional_env("REQUIRE_LANGUAGES").as_deref())
                .context("REQUIRE_LANGUAGES must be true or false")?,
            ..RequiredSteps::default()
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_models: parse_model_list(optional_env("LLM_MODELS").as_deref()),
            match_score_ttl_secs: optional_env("MATCH_SCORE_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse::<u64>()
                .context("MATCH_SCORE_TTL_SECS must be a whole number of seconds")?,
            required_steps,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/seeker_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "seeker-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            llm_models: vec![DEFAULT_MODEL.to_string()],
            match_score_ttl_secs: 60,
            required_steps: RequiredSteps::default(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Comma separated list; blank entries dropped; falls back to the default model.
fn parse_model_list(raw: Option<&str>) -> Vec<String> {
    let models: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect();
    if models.is_empty() {
        vec![DEFAULT_MODEL.to_string()]
    } else {
        models
    }
}

fn parse_flag(raw: Option<&str>) -> Result<bool> {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no") => Ok(false),
        Some(v) => anyhow::bail!("unrecognised flag value '{v}'"),
    }
}
