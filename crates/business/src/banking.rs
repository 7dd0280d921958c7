//! Banking operations - bank surplus, apply banked surplus
//!
//! BankingService implements deposit and FIFO withdrawal on the banking
//! ledger. Apply chạy trong một SQLite transaction: đọc entries, update
//! entries, ghi compliance record mới; lỗi ở bất kỳ bước nào rollback
//! toàn bộ.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{ApplyBankedResult, BankBalance, ServiceContext};
use fueleu_core::{
    banked_balance, checked_total, plan_withdrawal, validate_deposit, BankEntry, ComplianceEvent,
    NewComplianceRecord,
};
use fueleu_persistence::{BankRepo, ComplianceRepo};
use rust_decimal::Decimal;

/// Banking Service
pub struct BankingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BankingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Gửi surplus vào bank; mỗi deposit là một entry riêng
    pub async fn bank_surplus(
        &self,
        ship_id: &str,
        year: i32,
        amount: Decimal,
    ) -> BusinessResult<BankEntry> {
        let deposit = validate_deposit(ship_id, year, amount)?;

        let mut conn = self.ctx.conn().await?;
        let entry = BankRepo::create(&mut conn, &deposit).await?;
        drop(conn);

        tracing::info!(ship_id, year, entry_id = entry.id, %amount, "surplus banked");
        self.ctx
            .record(|id| ComplianceEvent::surplus_banked(id, ship_id, year, amount))
            .await;

        Ok(entry)
    }

    /// Apply banked surplus vào CB năm `year`, tiêu thụ entries năm cũ nhất trước
    pub async fn apply_banked(
        &self,
        ship_id: &str,
        year: i32,
        apply_amount: Decimal,
    ) -> BusinessResult<ApplyBankedResult> {
        if ship_id.trim().is_empty() {
            return Err(BusinessError::validation("Ship ID is required."));
        }
        if year <= 0 {
            return Err(BusinessError::validation("Year is required."));
        }

        let mut tx = self.ctx.pool().begin().await?;

        let entries = BankRepo::find_by_ship(&mut tx, ship_id).await?;
        let plan = plan_withdrawal(ship_id, &entries, apply_amount)?;
        tracing::debug!(
            ship_id,
            requested = %plan.requested,
            available = %plan.available,
            touched = plan.updated_entries.len(),
            "withdrawal planned"
        );

        for entry in &plan.updated_entries {
            BankRepo::update(&mut tx, entry).await?;
        }

        let current = ComplianceRepo::find_by_ship_and_year(&mut tx, ship_id, year)
            .await?
            .ok_or_else(|| {
                BusinessError::not_found("ShipCompliance", format!("{}-{}", ship_id, year))
            })?;

        let cb_before = current.cb_gco2eq;
        let cb_after = checked_total(cb_before, apply_amount, "Compliance balance")?;
        ComplianceRepo::create(
            &mut tx,
            &NewComplianceRecord {
                ship_id: ship_id.to_string(),
                year,
                cb_gco2eq: cb_after,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(ship_id, year, %cb_before, applied = %apply_amount, %cb_after, "banked surplus applied");
        self.ctx
            .record(|id| {
                ComplianceEvent::banked_applied(id, ship_id, year, apply_amount, cb_before, cb_after)
            })
            .await;

        Ok(ApplyBankedResult {
            ship_id: ship_id.to_string(),
            year,
            cb_before,
            applied: apply_amount,
            cb_after,
        })
    }

    /// Bank entries của ship, có thể lọc theo năm
    pub async fn records(&self, ship_id: &str, year: Option<i32>) -> BusinessResult<Vec<BankEntry>> {
        if ship_id.trim().is_empty() {
            return Err(BusinessError::validation("Ship ID is required."));
        }

        let mut conn = self.ctx.conn().await?;
        let entries = match year {
            Some(year) => BankRepo::find_by_ship_and_year(&mut conn, ship_id, year).await?,
            None => BankRepo::find_by_ship(&mut conn, ship_id).await?,
        };
        Ok(entries)
    }

    /// Tổng banked surplus còn lại của ship
    pub async fn balance(&self, ship_id: &str) -> BusinessResult<BankBalance> {
        let entries = self.records(ship_id, None).await?;
        Ok(BankBalance {
            ship_id: ship_id.to_string(),
            entries: entries.len(),
            balance: banked_balance(&entries)?,
        })
    }
}
