//! # FuelEU Persistence
//!
//! SQLite giữ trạng thái (routes, compliance, bank, pools), JSONL giữ audit
//! trail. `Database` gói cả hai; repos nhận `&mut SqliteConnection` nên chạy
//! được trong hoặc ngoài transaction.

pub mod error;
pub mod events;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use events::{EventFilter, EventReader, EventStore};
pub use sqlite::{
    connect_in_memory, init_database, run_migrations, seed_routes, BankRepo, ComplianceRepo,
    EventSequenceRepo, PoolRepo, RouteRepo,
};

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

pub struct Database {
    pool: SqlitePool,
    event_store: Arc<EventStore>,
}

impl Database {
    /// Mở (tạo nếu chưa có) database file, chạy migrations, mở event log
    pub async fn open<Q: AsRef<Path>>(db_url: &str, events_path: Q) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Self::assemble(pool, events_path).await
    }

    /// In-memory SQLite, events vẫn ghi ra `events_path`
    pub async fn in_memory<Q: AsRef<Path>>(events_path: Q) -> PersistenceResult<Self> {
        let pool = connect_in_memory().await?;
        Self::assemble(pool, events_path).await
    }

    /// Sequence cấp event id phải đi sau event cuối đã có trong log
    async fn assemble<Q: AsRef<Path>>(pool: SqlitePool, events_path: Q) -> PersistenceResult<Self> {
        let event_store = EventStore::new(events_path)?;

        if let Some(last) = event_store.last_event()?.and_then(|e| e.sequence()) {
            let mut conn = pool.acquire().await?;
            EventSequenceRepo::advance_past(&mut conn, last).await?;
        }

        Ok(Self {
            pool,
            event_store: Arc::new(event_store),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn shared_events(&self) -> Arc<EventStore> {
        Arc::clone(&self.event_store)
    }

    /// Seed reference routes; trả về số route mới
    pub async fn seed(&self) -> PersistenceResult<u64> {
        let mut conn = self.pool.acquire().await?;
        seed_routes(&mut conn).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
