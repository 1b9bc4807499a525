//! Persistence sink for prediction requests
//!
//! `PgStudentStore` writes to PostgreSQL; `MemoryStudentStore` keeps records
//! in process (selected with `DATABASE_URL=memory://`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::models::{RiskLevel, StudentInput, StudentRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Append one record; returns it with `id` and `created_at` set
    async fn insert(&self, input: &StudentInput, risk: RiskLevel) -> Result<StudentRecord, StoreError>;

    /// Whether the backing storage currently answers
    async fn ping(&self) -> bool;

    /// Number of stored records
    async fn count(&self) -> Result<i64, StoreError>;

    fn name(&self) -> &'static str;
}

/// Shared store handle
pub type SharedStore = Arc<dyn StudentStore>;

// ============================================================================
// POSTGRES
// ============================================================================

#[derive(Debug, Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, input: &StudentInput, risk: RiskLevel) -> Result<StudentRecord, StoreError> {
        Ok(StudentRecord::insert(&self.pool, input, risk).await?)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(StudentRecord::count(&self.pool).await?)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

// ============================================================================
// IN-MEMORY
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<StudentRecord>,
    last_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStudentStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored records, oldest first
    #[cfg(test)]
    pub async fn records(&self) -> Vec<StudentRecord> {
        self.state.read().await.records.clone()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, input: &StudentInput, risk: RiskLevel) -> Result<StudentRecord, StoreError> {
        let mut state = self.state.write().await;

        // wall clock may step backwards; created_at must not
        let now = Utc::now();
        let created_at = match state.last_created {
            Some(last) if last > now => last,
            _ => now,
        };

        let mut record = StudentRecord::unpersisted(input.clone(), risk);
        record.id = Some(state.records.len() as i64 + 1);
        record.created_at = Some(created_at);

        state.last_created = Some(created_at);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> bool {
        true
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state.read().await.records.len() as i64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
