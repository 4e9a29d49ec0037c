mod config;
mod db;
mod documents;
mod errors;
mod identity;
mod llm_client;
mod matching;
mod media;
mod models;
mod onboarding;
mod pagination;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::{LlmClient, ModelRotation};
use crate::matching::cache::RedisScoreCache;
use crate::matching::scoring::CosineMatchScorer;
use crate::media::S3MediaStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Seeker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let score_cache = Arc::new(RedisScoreCache::new(redis, config.match_score_ttl_secs));
    info!(
        "Redis score cache initialized (ttl {}s)",
        config.match_score_ttl_secs
    );

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let media = Arc::new(S3MediaStore::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_endpoint.clone(),
    ));
    info!("S3 client initialized");

    // Initialize LLM client
    let rotation = ModelRotation::new(config.llm_models.clone())?;
    let llm = LlmClient::new(config.anthropic_api_key.clone(), rotation)?;
    info!("LLM client initialized (models: {})", config.llm_models.join(", "));

    // Build app state
    let state = AppState {
        seekers: store.clone(),
        jobs: store.clone(),
        applications: store,
        media,
        score_cache,
        scorer: Arc::new(CosineMatchScorer::default()),
        llm: Arc::new(llm),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "seeker-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
