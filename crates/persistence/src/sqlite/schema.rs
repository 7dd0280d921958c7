//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20261018000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use fueleu_core::{BankEntry, ComplianceRecord, PoolMember, Route};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row type cho bảng `routes`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct RouteRow {
    pub id: i64,
    pub route_id: String,
    pub vessel_type: String,
    pub fuel_type: String,
    pub year: i32,
    pub ghg_intensity: String,    // Decimal stored as TEXT
    pub fuel_consumption: String, // Decimal stored as TEXT
    pub distance: String,         // Decimal stored as TEXT
    pub total_emissions: String,  // Decimal stored as TEXT
    pub is_baseline: bool,
}

/// Row type cho bảng `ship_compliance`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ComplianceRow {
    pub id: i64,
    pub ship_id: String,
    pub year: i32,
    pub cb_gco2eq: String, // Decimal stored as TEXT
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `bank_entries`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BankEntryRow {
    pub id: i64,
    pub ship_id: String,
    pub year: i32,
    pub amount: String, // Decimal stored as TEXT
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `pools`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PoolRow {
    pub id: i64,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `pool_members`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PoolMemberRow {
    pub pool_id: i64,
    pub position: i64,
    pub ship_id: String,
    pub cb_before: String, // Decimal stored as TEXT
    pub cb_after: String,  // Decimal stored as TEXT
}

/// Parse cột TEXT thành Decimal
pub(crate) fn parse_decimal(column: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value).map_err(|_| PersistenceError::invalid_decimal(column, value))
}

// === Conversion implementations ===

impl TryFrom<RouteRow> for Route {
    type Error = PersistenceError;

    fn try_from(row: RouteRow) -> PersistenceResult<Self> {
        Ok(Route {
            id: row.id,
            ghg_intensity: parse_decimal("ghg_intensity", &row.ghg_intensity)?,
            fuel_consumption: parse_decimal("fuel_consumption", &row.fuel_consumption)?,
            distance: parse_decimal("distance", &row.distance)?,
            total_emissions: parse_decimal("total_emissions", &row.total_emissions)?,
            route_id: row.route_id,
            vessel_type: row.vessel_type,
            fuel_type: row.fuel_type,
            year: row.year,
            is_baseline: row.is_baseline,
        })
    }
}

impl TryFrom<ComplianceRow> for ComplianceRecord {
    type Error = PersistenceError;

    fn try_from(row: ComplianceRow) -> PersistenceResult<Self> {
        Ok(ComplianceRecord {
            id: row.id,
            cb_gco2eq: parse_decimal("cb_gco2eq", &row.cb_gco2eq)?,
            ship_id: row.ship_id,
            year: row.year,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<BankEntryRow> for BankEntry {
    type Error = PersistenceError;

    fn try_from(row: BankEntryRow) -> PersistenceResult<Self> {
        Ok(BankEntry {
            id: row.id,
            amount: parse_decimal("amount", &row.amount)?,
            ship_id: row.ship_id,
            year: row.year,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<PoolMemberRow> for PoolMember {
    type Error = PersistenceError;

    fn try_from(row: PoolMemberRow) -> PersistenceResult<Self> {
        Ok(PoolMember {
            cb_before: parse_decimal("cb_before", &row.cb_before)?,
            cb_after: parse_decimal("cb_after", &row.cb_after)?,
            ship_id: row.ship_id,
        })
    }
}

/// Convert nhiều rows, dừng ở row lỗi đầu tiên
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> PersistenceResult<Vec<T>>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
