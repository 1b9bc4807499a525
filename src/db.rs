//! Database module - PostgreSQL connection and schema

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the schema (idempotent)
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Prediction requests (append-only)
CREATE TABLE IF NOT EXISTS students (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL DEFAULT 'Student',
    age INT NOT NULL,
    gender VARCHAR(20) NOT NULL DEFAULT 'Unknown',
    attendance_percent DOUBLE PRECISION NOT NULL,
    avg_marks DOUBLE PRECISION NOT NULL,
    prev_failures INT NOT NULL DEFAULT 0,
    parents_education INT NOT NULL DEFAULT 0,
    family_income DOUBLE PRECISION NOT NULL DEFAULT 0,
    extracurricular INT NOT NULL DEFAULT 0,
    behavior_issues INT NOT NULL DEFAULT 0,
    predicted_risk VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_students_created ON students(created_at);
CREATE INDEX IF NOT EXISTS idx_students_risk ON students(predicted_risk);
"#;
