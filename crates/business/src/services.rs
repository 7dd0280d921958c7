//! Service context and result types
//!
//! `ServiceContext` gom database pool, audit event store và rules config
//! cho mọi service.

use crate::error::BusinessResult;
use fueleu_core::{format_event_id, ComplianceEvent, RulesConfig};
use fueleu_persistence::{Database, EventSequenceRepo, EventStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};
use std::sync::Arc;

/// Context for business operations - contains database access
pub struct ServiceContext {
    pool: SqlitePool,
    events: Arc<EventStore>,
    config: RulesConfig,
}

impl ServiceContext {
    /// Create new service context from database
    pub fn new(db: &Database, config: RulesConfig) -> Self {
        Self {
            pool: db.pool().clone(),
            events: db.shared_events(),
            config,
        }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get event store
    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Lấy một connection từ pool.
    ///
    /// Không giữ connection này khi mở thêm connection khác: in-memory pool
    /// chỉ có một connection.
    pub(crate) async fn conn(&self) -> BusinessResult<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    async fn issue_event_id(&self) -> BusinessResult<String> {
        let mut conn = self.conn().await?;
        Ok(format_event_id(EventSequenceRepo::next(&mut conn).await?))
    }

    /// Ghi audit event sau khi state change đã commit.
    ///
    /// `build` nhận event id lấy từ `EventSequenceRepo`. State đã commit thì
    /// không rollback được nữa, nên lỗi cấp id hay ghi log chỉ được log.
    pub(crate) async fn record<F>(&self, build: F)
    where
        F: FnOnce(&str) -> ComplianceEvent,
    {
        let event = match self.issue_event_id().await {
            Ok(id) => build(&id),
            Err(err) => {
                tracing::warn!(error = %err, "failed to issue audit event id");
                return;
            }
        };

        if let Err(err) = self.events.append(&event) {
            tracing::warn!(
                event_id = %event.event_id,
                event_type = %event.event_type,
                error = %err,
                "failed to append audit event"
            );
        }
    }
}

/// Kết quả apply banked surplus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyBankedResult {
    pub ship_id: String,
    pub year: i32,
    pub cb_before: Decimal,
    pub applied: Decimal,
    pub cb_after: Decimal,
}

/// Một dòng adjusted CB: record mới nhất của ship trong năm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedCb {
    pub ship_id: String,
    pub year: i32,
    pub cb_gco2eq: Decimal,
}

/// Kết quả tạo pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResult {
    pub pool_id: i64,
    pub year: i32,
    pub pool_sum: Decimal,
    pub members: Vec<fueleu_core::PoolMember>,
}

/// Banked balance của một ship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankBalance {
    pub ship_id: String,
    pub entries: usize,
    pub balance: Decimal,
}
