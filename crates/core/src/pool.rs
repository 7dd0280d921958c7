//! # Pool Module
//!
//! Pooling gom CB của nhiều ship trong cùng một năm và chuyển surplus
//! sang deficit.
//!
//! ## Redistribution
//!
//! ```text
//! sorted desc by cb_before (stable)
//!   [ +120 | +30 | 0 | -40 | -90 ]
//!     ^donor                  ^receiver
//! ```
//!
//! Donor đi từ đầu, receiver đi từ cuối (deficit lớn nhất trước). Mỗi bước
//! chuyển `min(donor.cb_after, |receiver.cb_after|)`. Receiver đã được bù
//! đủ luôn là một suffix, nên hai con trỏ cho cùng kết quả với cách quét
//! receiver ngược cho từng donor.
//!
//! ## Invariants
//! - sum(cb_before) >= 0, nếu không pool bị từ chối trước khi phân bổ
//! - sum(cb_after) == sum(cb_before)
//! - deficit member không bao giờ tệ hơn, surplus member không âm

use crate::amount::checked_sum;
use crate::config::PoolingMode;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input của một member: CB trước khi pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMemberInput {
    pub ship_id: String,
    pub cb_before: Decimal,
}

impl PoolMemberInput {
    pub fn new(ship_id: &str, cb_before: Decimal) -> Self {
        Self {
            ship_id: ship_id.to_string(),
            cb_before,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    pub ship_id: String,
    pub cb_before: Decimal,
    pub cb_after: Decimal,
}

/// Persisted pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: Option<i64>,
    pub year: i32,
    pub members: Vec<PoolMember>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Pool {
    pub fn total_before(&self) -> CoreResult<Decimal> {
        checked_sum(self.members.iter().map(|m| m.cb_before), "Pool total")
    }

    pub fn total_after(&self) -> CoreResult<Decimal> {
        checked_sum(self.members.iter().map(|m| m.cb_after), "Pool total")
    }
}

/// Kết quả redistribution, chưa persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAllocation {
    pub year: i32,
    /// sum(cb_before)
    pub pool_sum: Decimal,
    /// Theo thứ tự cb_before giảm dần
    pub members: Vec<PoolMember>,
}

impl PoolAllocation {
    /// Tổng deficit còn lại sau phân bổ (<= 0)
    pub fn residual_deficit(&self) -> CoreResult<Decimal> {
        checked_sum(
            self.members.iter().map(|m| m.cb_after.min(Decimal::ZERO)),
            "Residual deficit",
        )
    }

    pub fn into_pool(self) -> Pool {
        Pool {
            id: None,
            year: self.year,
            members: self.members,
            created_at: None,
        }
    }
}

/// Validate và phân bổ CB trong pool.
///
/// # Errors
/// - `Validation`: year thiếu, không có member, ship_id rỗng hoặc trùng
/// - `BusinessRule`: tổng CB < 0 hoặc tràn Decimal, hoặc kết quả vi phạm invariant
///   (ở `Strict` mode: còn member có cb_after < 0)
pub fn allocate_pool(
    year: i32,
    inputs: &[PoolMemberInput],
    mode: PoolingMode,
) -> CoreResult<PoolAllocation> {
    if year <= 0 {
        return Err(CoreError::validation("Year is required."));
    }
    if inputs.is_empty() {
        return Err(CoreError::validation("At least one pool member is required."));
    }

    let mut seen = HashSet::new();
    for input in inputs {
        if input.ship_id.trim().is_empty() {
            return Err(CoreError::validation("Pool member ship ID is required."));
        }
        if !seen.insert(input.ship_id.as_str()) {
            return Err(CoreError::validation(format!(
                "Duplicate pool member: {}",
                input.ship_id
            )));
        }
    }

    let pool_sum = checked_sum(inputs.iter().map(|m| m.cb_before), "Pool total")?;
    if pool_sum < Decimal::ZERO {
        return Err(CoreError::business_rule(
            "Invalid pool: total compliance balance must be >= 0",
        ));
    }

    let members = redistribute(inputs);
    verify_allocation(&members, pool_sum, mode)?;

    Ok(PoolAllocation {
        year,
        pool_sum,
        members,
    })
}

/// Greedy redistribution, hai con trỏ trên danh sách đã sort.
fn redistribute(inputs: &[PoolMemberInput]) -> Vec<PoolMember> {
    let mut members: Vec<PoolMember> = inputs
        .iter()
        .map(|m| PoolMember {
            ship_id: m.ship_id.clone(),
            cb_before: m.cb_before,
            cb_after: m.cb_before,
        })
        .collect();
    // sort_by là stable: tie giữ thứ tự input
    members.sort_by(|a, b| b.cb_before.cmp(&a.cb_before));

    if members.len() < 2 {
        return members;
    }

    let mut donor = 0;
    let mut receiver = members.len() - 1;
    while donor < receiver {
        if members[donor].cb_after <= Decimal::ZERO {
            break;
        }
        if members[receiver].cb_after >= Decimal::ZERO {
            break;
        }

        let transfer = members[donor].cb_after.min(-members[receiver].cb_after);
        members[donor].cb_after -= transfer;
        members[receiver].cb_after += transfer;

        if members[donor].cb_after == Decimal::ZERO {
            donor += 1;
        }
        if members[receiver].cb_after == Decimal::ZERO {
            receiver -= 1;
        }
    }

    members
}

fn verify_allocation(members: &[PoolMember], pool_sum: Decimal, mode: PoolingMode) -> CoreResult<()> {
    let total_after = checked_sum(members.iter().map(|m| m.cb_after), "Pool total")?;
    if total_after != pool_sum {
        return Err(CoreError::business_rule(format!(
            "Pool not conserved: before {}, after {}",
            pool_sum, total_after
        )));
    }

    for m in members {
        if m.cb_before < Decimal::ZERO && m.cb_after < m.cb_before {
            return Err(CoreError::business_rule(format!(
                "Deficit ship {} exits worse off.",
                m.ship_id
            )));
        }
        if m.cb_before >= Decimal::ZERO && m.cb_after < Decimal::ZERO {
            return Err(CoreError::business_rule(format!(
                "Surplus ship {} cannot go negative.",
                m.ship_id
            )));
        }
        if mode == PoolingMode::Strict && m.cb_after < Decimal::ZERO {
            return Err(CoreError::business_rule(format!(
                "Deficit ship {} exits worse off.",
                m.ship_id
            )));
        }
    }

    Ok(())
}
