//! # Event Module
//!
//! Audit events cho mỗi state change đã commit (baseline, CB, banking,
//! pooling). Events được ghi vào JSONL files bởi persistence layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại sự kiện trong hệ thống.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Baseline route được chuyển
    BaselineSet,
    /// Một compliance record mới từ route data
    ComplianceCalculated,
    /// Surplus được gửi vào bank
    SurplusBanked,
    /// Banked surplus được apply vào CB năm hiện tại
    BankedApplied,
    /// Pool mới được tạo
    PoolCreated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BaselineSet => "baseline_set",
            EventType::ComplianceCalculated => "compliance_calculated",
            EventType::SurplusBanked => "surplus_banked",
            EventType::BankedApplied => "banked_applied",
            EventType::PoolCreated => "pool_created",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "baseline_set" => Some(EventType::BaselineSet),
            "compliance_calculated" => Some(EventType::ComplianceCalculated),
            "surplus_banked" => Some(EventType::SurplusBanked),
            "banked_applied" => Some(EventType::BankedApplied),
            "pool_created" => Some(EventType::PoolCreated),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const EVENT_ID_PREFIX: &str = "EVT_";

/// Event id từ số thứ tự: 42 -> `EVT_000042`
pub fn format_event_id(seq: i64) -> String {
    format!("{}{:06}", EVENT_ID_PREFIX, seq)
}

/// Một dòng audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceEvent {
    /// EVT_000001, ...
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    /// Ship (hoặc route) liên quan; nhiều ship thì nằm trong `details`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl ComplianceEvent {
    pub fn new(event_id: impl Into<String>, event_type: EventType) -> Self {
        Self {
            event_id: event_id.into(),
            timestamp: Utc::now(),
            event_type,
            ship_id: None,
            year: None,
            amount: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_ship(mut self, ship_id: &str) -> Self {
        self.ship_id = Some(ship_id.to_string());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    // === Factory methods ===

    pub fn baseline_set(event_id: &str, route_id: &str, year: i32) -> Self {
        Self::new(event_id, EventType::BaselineSet)
            .with_ship(route_id)
            .with_year(year)
    }

    pub fn compliance_calculated(event_id: &str, ship_id: &str, year: i32, cb: Decimal) -> Self {
        Self::new(event_id, EventType::ComplianceCalculated)
            .with_ship(ship_id)
            .with_year(year)
            .with_amount(cb)
    }

    pub fn surplus_banked(event_id: &str, ship_id: &str, year: i32, amount: Decimal) -> Self {
        Self::new(event_id, EventType::SurplusBanked)
            .with_ship(ship_id)
            .with_year(year)
            .with_amount(amount)
    }

    pub fn banked_applied(
        event_id: &str,
        ship_id: &str,
        year: i32,
        applied: Decimal,
        cb_before: Decimal,
        cb_after: Decimal,
    ) -> Self {
        Self::new(event_id, EventType::BankedApplied)
            .with_ship(ship_id)
            .with_year(year)
            .with_amount(applied)
            .with_details(serde_json::json!({
                "cb_before": cb_before.to_string(),
                "cb_after": cb_after.to_string(),
            }))
    }

    pub fn pool_created(event_id: &str, pool_id: i64, year: i32, pool_sum: Decimal, ships: &[&str]) -> Self {
        Self::new(event_id, EventType::PoolCreated)
            .with_year(year)
            .with_amount(pool_sum)
            .with_details(serde_json::json!({
                "pool_id": pool_id,
                "ships": ships,
            }))
    }

    /// Số thứ tự trong event id; `None` nếu id không theo format `EVT_nnnnnn`
    pub fn sequence(&self) -> Option<i64> {
        self.event_id.strip_prefix(EVENT_ID_PREFIX)?.parse().ok()
    }

    /// Event có liên quan tới ship này không (kể cả là member của pool)
    pub fn involves_ship(&self, ship_id: &str) -> bool {
        if self.ship_id.as_deref() == Some(ship_id) {
            return true;
        }
        self.details
            .get("ships")
            .and_then(|v| v.as_array())
            .map_or(false, |ships| ships.iter().any(|s| s.as_str() == Some(ship_id)))
    }
}
