//! # Compliance Balance
//!
//! CB = (target - actual) × (fuel × energy factor), làm tròn 6 chữ số
//! thập phân bằng decimal arithmetic (không dùng f64).
//!
//! Compliance records là append-only: mỗi lần tính hoặc apply banked tạo
//! một record mới; "current CB" là record mới nhất của ship/year.

use crate::amount::checked_product;
use crate::config::RulesConfig;
use crate::constants::CB_DECIMALS;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Trạng thái của CB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbStatus {
    Surplus,
    Deficit,
    Neutral,
}

impl CbStatus {
    /// Status theo dấu của CB (sau khi làm tròn)
    pub fn from_cb(cb: Decimal) -> Self {
        if cb > Decimal::ZERO {
            CbStatus::Surplus
        } else if cb < Decimal::ZERO {
            CbStatus::Deficit
        } else {
            CbStatus::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CbStatus::Surplus => "Surplus",
            CbStatus::Deficit => "Deficit",
            CbStatus::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for CbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kết quả tính CB cho một ship/year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceBalance {
    pub ship_id: String,
    pub year: i32,
    pub target_intensity: Decimal,
    pub actual_intensity: Decimal,
    pub fuel_consumption: Decimal,
    pub energy_in_scope_mj: Decimal,
    /// Signed CB (gCO2eq)
    pub cb_gco2eq: Decimal,
    pub status: CbStatus,
}

/// Tính CB với target và energy factor trong config.
///
/// # Errors
/// `Validation` khi ship_id rỗng, year thiếu, actual intensity <= 0,
/// fuel consumption <= 0, hoặc fuel/intensity lớn tới mức CB tràn Decimal.
pub fn compute_compliance_balance(
    ship_id: &str,
    year: i32,
    actual_intensity: Decimal,
    fuel_consumption: Decimal,
    config: &RulesConfig,
) -> CoreResult<ComplianceBalance> {
    if ship_id.trim().is_empty() {
        return Err(CoreError::validation("Ship ID is required."));
    }
    if year <= 0 {
        return Err(CoreError::validation("Year is required."));
    }
    if actual_intensity <= Decimal::ZERO {
        return Err(CoreError::validation("Actual intensity must be greater than zero"));
    }
    if fuel_consumption <= Decimal::ZERO {
        return Err(CoreError::validation("Fuel consumption must be greater than zero"));
    }

    let energy = checked_product(fuel_consumption, config.energy_factor, "Energy in scope")?;
    // target và actual đều dương nên hiệu không tràn
    let cb = checked_product(config.target_intensity - actual_intensity, energy, "Compliance balance")?
        .round_dp_with_strategy(CB_DECIMALS, RoundingStrategy::MidpointAwayFromZero);

    Ok(ComplianceBalance {
        ship_id: ship_id.to_string(),
        year,
        target_intensity: config.target_intensity,
        actual_intensity,
        fuel_consumption,
        energy_in_scope_mj: energy,
        cb_gco2eq: cb,
        status: CbStatus::from_cb(cb),
    })
}

/// Persisted compliance record (một dòng history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: i64,
    pub ship_id: String,
    pub year: i32,
    pub cb_gco2eq: Decimal,
    pub created_at: DateTime<Utc>,
}

impl ComplianceRecord {
    pub fn status(&self) -> CbStatus {
        CbStatus::from_cb(self.cb_gco2eq)
    }
}

/// Compliance record chưa lưu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplianceRecord {
    pub ship_id: String,
    pub year: i32,
    pub cb_gco2eq: Decimal,
}

impl From<&ComplianceBalance> for NewComplianceRecord {
    fn from(cb: &ComplianceBalance) -> Self {
        Self {
            ship_id: cb.ship_id.clone(),
            year: cb.year,
            cb_gco2eq: cb.cb_gco2eq,
        }
    }
}

/// Lấy record mới nhất (created_at, rồi id) cho mỗi ship.
///
/// Kết quả sắp theo ship_id.
pub fn latest_per_ship(records: &[ComplianceRecord]) -> Vec<ComplianceRecord> {
    let mut latest: HashMap<&str, &ComplianceRecord> = HashMap::new();

    for record in records {
        let newer = latest.get(record.ship_id.as_str()).map_or(true, |current| {
            (record.created_at, record.id) > (current.created_at, current.id)
        });
        if newer {
            latest.insert(record.ship_id.as_str(), record);
        }
    }

    let mut result: Vec<ComplianceRecord> = latest.into_values().cloned().collect();
    result.sort_by(|a, b| a.ship_id.cmp(&b.ship_id));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TARGET_INTENSITY;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn cb(actual: Decimal, fuel: Decimal) -> ComplianceBalance {
        compute_compliance_balance("S1", 2025, actual, fuel, &RulesConfig::default()).unwrap()
    }

    #[test]
    fn test_surplus() {
        // (89.3368 - 88.0) × 4800 × 41000
        let result = cb(dec!(88.0), dec!(4800));
        assert_eq!(result.energy_in_scope_mj, dec!(196800000));
        assert_eq!(result.cb_gco2eq, dec!(263082240));
        assert_eq!(result.status, CbStatus::Surplus);
    }

    #[test]
    fn test_deficit() {
        let result = cb(dec!(91.0), dec!(5000));
        assert_eq!(result.cb_gco2eq, dec!(-340956000));
        assert_eq!(result.status, CbStatus::Deficit);
    }

    #[test]
    fn test_neutral_on_target() {
        let result = cb(TARGET_INTENSITY, dec!(1234.5));
        assert_eq!(result.cb_gco2eq, Decimal::ZERO);
        assert_eq!(result.status, CbStatus::Neutral);
    }

    #[test]
    fn test_rounded_to_six_places() {
        // 0.0000001 × 41000 × 0.0000001 = 4.1e-10 -> 0 sau khi làm tròn
        let result = cb(TARGET_INTENSITY - dec!(0.0000001), dec!(0.0000001));
        assert_eq!(result.cb_gco2eq, Decimal::ZERO);
        assert_eq!(result.status, CbStatus::Neutral);

        let result = cb(dec!(89.3367999), dec!(0.001));
        // 0.0000001 × 41 = 0.0000041 -> 0.000004
        assert_eq!(result.cb_gco2eq, dec!(0.000004));
        assert!(result.cb_gco2eq.scale() <= 6);
    }

    #[test]
    fn test_formula_matches_for_many_inputs() {
        for (actual, fuel) in [
            (dec!(70.25), dec!(1)),
            (dec!(89.3368), dec!(99999)),
            (dec!(120.123456), dec!(0.5)),
            (dec!(93.5), dec!(5100)),
        ] {
            let result = cb(actual, fuel);
            let expected = ((TARGET_INTENSITY - actual) * fuel * dec!(41000))
                .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero);
            assert_eq!(result.cb_gco2eq, expected);
            assert_eq!(result.status, CbStatus::from_cb(expected));
        }
    }

    #[test]
    fn test_validation_errors() {
        let config = RulesConfig::default();

        let err = compute_compliance_balance("S1", 2025, dec!(90), Decimal::ZERO, &config)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Fuel consumption"));

        let err =
            compute_compliance_balance("S1", 2025, dec!(-1), dec!(10), &config).unwrap_err();
        assert!(err.is_validation());

        let err = compute_compliance_balance("S1", 0, dec!(90), dec!(10), &config).unwrap_err();
        assert!(err.to_string().contains("Year is required"));

        let err = compute_compliance_balance(" ", 2025, dec!(90), dec!(10), &config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_huge_fuel_is_validation_error() {
        let config = RulesConfig::default();

        let err = compute_compliance_balance("S1", 2025, dec!(1), dec!(1e25), &config)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("out of range"));

        let err = compute_compliance_balance("S1", 2025, dec!(1), Decimal::MAX, &config)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_latest_per_ship() {
        let at = |secs: i64| Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        let records = vec![
            ComplianceRecord {
                id: 1,
                ship_id: "S2".to_string(),
                year: 2025,
                cb_gco2eq: dec!(-50),
                created_at: at(0),
            },
            ComplianceRecord {
                id: 2,
                ship_id: "S1".to_string(),
                year: 2025,
                cb_gco2eq: dec!(10),
                created_at: at(5),
            },
            ComplianceRecord {
                id: 3,
                ship_id: "S2".to_string(),
                year: 2025,
                cb_gco2eq: dec!(70),
                created_at: at(10),
            },
            // cùng timestamp, id lớn hơn thắng
            ComplianceRecord {
                id: 4,
                ship_id: "S1".to_string(),
                year: 2025,
                cb_gco2eq: dec!(15),
                created_at: at(5),
            },
        ];

        let latest = latest_per_ship(&records);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].ship_id, "S1");
        assert_eq!(latest[0].cb_gco2eq, dec!(15));
        assert_eq!(latest[1].ship_id, "S2");
        assert_eq!(latest[1].cb_gco2eq, dec!(70));
    }
}
