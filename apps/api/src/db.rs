use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Idempotent schema setup, applied in order at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS seeker_profiles (
        user_id     UUID PRIMARY KEY,
        document    JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS entry_timelines (
        user_id                           UUID PRIMARY KEY REFERENCES seeker_profiles (user_id) ON DELETE CASCADE,
        personal_infos_completed          BOOLEAN NOT NULL DEFAULT FALSE,
        personal_infos_required           BOOLEAN NOT NULL DEFAULT TRUE,
        professional_summaries_completed  BOOLEAN NOT NULL DEFAULT FALSE,
        professional_summaries_required   BOOLEAN NOT NULL DEFAULT TRUE,
        work_experiences_completed        BOOLEAN NOT NULL DEFAULT FALSE,
        work_experiences_required         BOOLEAN NOT NULL DEFAULT TRUE,
        educations_completed              BOOLEAN NOT NULL DEFAULT FALSE,
        educations_required               BOOLEAN NOT NULL DEFAULT TRUE,
        certificates_completed            BOOLEAN NOT NULL DEFAULT FALSE,
        certificates_required             BOOLEAN NOT NULL DEFAULT FALSE,
        languages_completed               BOOLEAN NOT NULL DEFAULT FALSE,
        languages_required                BOOLEAN NOT NULL DEFAULT FALSE,
        preferred_job_titles_completed    BOOLEAN NOT NULL DEFAULT FALSE,
        preferred_job_titles_required     BOOLEAN NOT NULL DEFAULT TRUE,
        completed                         BOOLEAN NOT NULL DEFAULT FALSE,
        created_at                        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at                        TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        job_id       TEXT PRIMARY KEY,
        title        TEXT NOT NULL,
        company      TEXT NOT NULL DEFAULT '',
        location     TEXT NOT NULL DEFAULT '',
        posted_date  DATE,
        job_type     TEXT NOT NULL DEFAULT '',
        skills       TEXT NOT NULL DEFAULT '',
        description  TEXT NOT NULL DEFAULT '',
        job_link     TEXT NOT NULL DEFAULT '',
        source       TEXT NOT NULL DEFAULT '',
        ingested_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS selected_jobs (
        user_id                 UUID NOT NULL REFERENCES seeker_profiles (user_id) ON DELETE CASCADE,
        job_id                  TEXT NOT NULL,
        title                   TEXT NOT NULL,
        company                 TEXT NOT NULL,
        location                TEXT NOT NULL,
        match_score             DOUBLE PRECISION NOT NULL,
        cv_generated            BOOLEAN NOT NULL DEFAULT FALSE,
        cover_letter_generated  BOOLEAN NOT NULL DEFAULT FALSE,
        view_link               BOOLEAN NOT NULL DEFAULT FALSE,
        selected_at             TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, job_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS saved_jobs (
        user_id   UUID NOT NULL REFERENCES seeker_profiles (user_id) ON DELETE CASCADE,
        job_id    TEXT NOT NULL,
        source    TEXT NOT NULL DEFAULT '',
        saved_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, job_id)
    )
    "#,
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the schema. Safe to run on every boot.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (i, statement) in SCHEMA.iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Schema statement {} failed", i + 1))?;
    }
    info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
