//! Pooling operations - create pool, list pools

use crate::error::{BusinessError, BusinessResult};
use crate::services::{PoolResult, ServiceContext};
use fueleu_core::{allocate_pool, latest_per_ship, ComplianceEvent, Pool, PoolMemberInput};
use fueleu_persistence::{ComplianceRepo, PoolRepo};

/// Pooling Service
pub struct PoolingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PoolingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Phân bổ CB trong pool rồi lưu pool + members
    pub async fn create_pool(
        &self,
        year: i32,
        members: &[PoolMemberInput],
    ) -> BusinessResult<PoolResult> {
        let allocation = allocate_pool(year, members, self.ctx.config().pooling_mode)?;

        let residual = allocation.residual_deficit()?;
        if !residual.is_zero() {
            tracing::warn!(year, %residual, "pool leaves residual deficit");
        }

        let pool_sum = allocation.pool_sum;
        let mut conn = self.ctx.conn().await?;
        let pool = PoolRepo::create(&mut conn, &allocation.into_pool()).await?;
        drop(conn);

        let pool_id = pool
            .id
            .ok_or_else(|| BusinessError::not_found("Pool", "unsaved"))?;

        tracing::info!(pool_id, year, %pool_sum, members = pool.members.len(), "pool created");
        let ships: Vec<&str> = pool.members.iter().map(|m| m.ship_id.as_str()).collect();
        self.ctx
            .record(|id| ComplianceEvent::pool_created(id, pool_id, year, pool_sum, &ships))
            .await;

        Ok(PoolResult {
            pool_id,
            year,
            pool_sum,
            members: pool.members,
        })
    }

    /// Tạo pool từ adjusted CB (record mới nhất) của các ship trong năm
    pub async fn create_pool_for_ships(
        &self,
        year: i32,
        ship_ids: &[String],
    ) -> BusinessResult<PoolResult> {
        let mut conn = self.ctx.conn().await?;
        let records = ComplianceRepo::find_by_year(&mut conn, year).await?;
        drop(conn);

        let latest = latest_per_ship(&records);
        let members = ship_ids
            .iter()
            .map(|ship_id| {
                latest
                    .iter()
                    .find(|r| &r.ship_id == ship_id)
                    .map(|r| PoolMemberInput::new(ship_id, r.cb_gco2eq))
                    .ok_or_else(|| {
                        BusinessError::not_found("ShipCompliance", format!("{}-{}", ship_id, year))
                    })
            })
            .collect::<BusinessResult<Vec<_>>>()?;

        self.create_pool(year, &members).await
    }

    /// Danh sách pools, có thể lọc theo năm
    pub async fn list(&self, year: Option<i32>) -> BusinessResult<Vec<Pool>> {
        let mut conn = self.ctx.conn().await?;
        let pools = match year {
            Some(year) => PoolRepo::find_by_year(&mut conn, year).await?,
            None => PoolRepo::find_all(&mut conn).await?,
        };
        Ok(pools)
    }

    /// Pool đã lưu cùng members
    pub async fn get(&self, pool_id: i64) -> BusinessResult<Pool> {
        let mut conn = self.ctx.conn().await?;
        PoolRepo::find_by_id(&mut conn, pool_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Pool", pool_id))
    }
}
