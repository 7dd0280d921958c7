//! Compliance operations - CB calculation and adjusted CB snapshots
//!
//! Mỗi lần tính CB tạo một compliance record mới; record cũ không bao giờ
//! bị ghi đè.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{AdjustedCb, ServiceContext};
use fueleu_core::{
    compute_compliance_balance, latest_per_ship, ComplianceBalance, ComplianceEvent,
    ComplianceRecord, NewComplianceRecord,
};
use fueleu_persistence::{ComplianceRepo, RouteRepo};
use rust_decimal::Decimal;

/// Compliance Service
pub struct ComplianceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ComplianceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tính CB từ route data; route_id được dùng làm ship_id.
    pub async fn calculate_for_route(
        &self,
        route_id: &str,
        year: i32,
    ) -> BusinessResult<ComplianceBalance> {
        let mut conn = self.ctx.conn().await?;
        let route = RouteRepo::find_by_route_id(&mut conn, route_id)
            .await?
            .filter(|r| r.year == year)
            .ok_or_else(|| BusinessError::not_found("Route", format!("{}-{}", route_id, year)))?;
        drop(conn);

        self.compute(
            &route.route_id,
            route.year,
            route.ghg_intensity,
            route.fuel_consumption,
        )
        .await
    }

    /// Tính CB và lưu thành record mới
    pub async fn compute(
        &self,
        ship_id: &str,
        year: i32,
        actual_intensity: Decimal,
        fuel_consumption: Decimal,
    ) -> BusinessResult<ComplianceBalance> {
        let balance = compute_compliance_balance(
            ship_id,
            year,
            actual_intensity,
            fuel_consumption,
            self.ctx.config(),
        )?;
        tracing::debug!(
            ship_id,
            year,
            energy_mj = %balance.energy_in_scope_mj,
            cb = %balance.cb_gco2eq,
            "compliance balance computed"
        );

        let mut conn = self.ctx.conn().await?;
        let record = ComplianceRepo::create(&mut conn, &NewComplianceRecord::from(&balance)).await?;
        drop(conn);

        tracing::info!(
            ship_id,
            year,
            record_id = record.id,
            status = %balance.status,
            "compliance record created"
        );
        self.ctx
            .record(|id| ComplianceEvent::compliance_calculated(id, ship_id, year, balance.cb_gco2eq))
            .await;

        Ok(balance)
    }

    /// Record mới nhất của ship/year
    pub async fn current(&self, ship_id: &str, year: i32) -> BusinessResult<ComplianceRecord> {
        let mut conn = self.ctx.conn().await?;
        ComplianceRepo::find_by_ship_and_year(&mut conn, ship_id, year)
            .await?
            .ok_or_else(|| BusinessError::not_found("ShipCompliance", format!("{}-{}", ship_id, year)))
    }

    /// Toàn bộ history của ship/year, mới nhất trước
    pub async fn history(&self, ship_id: &str, year: i32) -> BusinessResult<Vec<ComplianceRecord>> {
        let mut conn = self.ctx.conn().await?;
        Ok(ComplianceRepo::find_history(&mut conn, ship_id, year).await?)
    }

    /// Adjusted CB của mọi ship trong năm (record mới nhất mỗi ship)
    pub async fn adjusted_cb(&self, year: i32) -> BusinessResult<Vec<AdjustedCb>> {
        if year <= 0 {
            return Err(BusinessError::validation("Year is required."));
        }

        let mut conn = self.ctx.conn().await?;
        let records = ComplianceRepo::find_by_year(&mut conn, year).await?;
        drop(conn);

        Ok(latest_per_ship(&records)
            .into_iter()
            .map(|r| AdjustedCb {
                ship_id: r.ship_id,
                year: r.year,
                cb_gco2eq: r.cb_gco2eq,
            })
            .collect())
    }
}
