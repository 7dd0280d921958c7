//! # Bank Module
//!
//! Banking ledger: mỗi deposit là một entry riêng (ship, year, amount).
//! Withdrawal tiêu thụ các entry theo năm tăng dần (FIFO), entry đã hết
//! vẫn giữ lại với amount = 0.
//!
//! Amount của entry không bao giờ âm.

use crate::amount::checked_sum;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Một entry trong banking ledger của ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub id: i64,
    pub ship_id: String,
    pub year: i32,
    /// Remaining banked surplus (gCO2eq), >= 0
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Deposit chưa lưu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBankEntry {
    pub ship_id: String,
    pub year: i32,
    pub amount: Decimal,
}

/// Validate một deposit surplus
pub fn validate_deposit(ship_id: &str, year: i32, amount: Decimal) -> CoreResult<NewBankEntry> {
    if ship_id.trim().is_empty() {
        return Err(CoreError::validation("Ship ID is required."));
    }
    if year <= 0 {
        return Err(CoreError::validation("Year is required."));
    }
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("Only positive CB can be banked."));
    }

    Ok(NewBankEntry {
        ship_id: ship_id.to_string(),
        year,
        amount,
    })
}

/// Tổng banked surplus còn lại
pub fn banked_balance(entries: &[BankEntry]) -> CoreResult<Decimal> {
    checked_sum(entries.iter().map(|e| e.amount), "Banked balance")
}

/// Kết quả plan rút banked surplus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub requested: Decimal,
    pub available: Decimal,
    /// Các entry bị thay đổi, với amount mới, theo thứ tự tiêu thụ
    pub updated_entries: Vec<BankEntry>,
}

/// Lập plan rút `apply_amount` từ các entry của ship, năm cũ nhất trước.
///
/// Hàm thuần: không có entry nào bị thay đổi nếu trả về lỗi.
///
/// # Errors
/// - `Validation` khi apply_amount <= 0
/// - `NotFound` khi ship không có entry nào
/// - `BusinessRule` khi apply_amount vượt quá tổng banked, hoặc tổng banked
///   tràn Decimal
pub fn plan_withdrawal(
    ship_id: &str,
    entries: &[BankEntry],
    apply_amount: Decimal,
) -> CoreResult<WithdrawalPlan> {
    if apply_amount <= Decimal::ZERO {
        return Err(CoreError::validation("Apply amount must be positive."));
    }

    let mut ledger: Vec<&BankEntry> = entries.iter().filter(|e| e.ship_id == ship_id).collect();
    if ledger.is_empty() {
        return Err(CoreError::not_found("Bank entries", ship_id));
    }

    let available = checked_sum(ledger.iter().map(|e| e.amount), "Banked balance")?;
    if apply_amount > available {
        return Err(CoreError::business_rule(format!(
            "Insufficient banked balance: requested {}, available {}",
            apply_amount, available
        )));
    }

    ledger.sort_by_key(|e| (e.year, e.id));

    let mut remaining = apply_amount;
    let mut updated_entries = Vec::new();
    for entry in ledger {
        if remaining <= Decimal::ZERO {
            break;
        }
        if entry.amount <= Decimal::ZERO {
            continue;
        }
        let used = entry.amount.min(remaining);
        remaining -= used;
        updated_entries.push(BankEntry {
            amount: entry.amount - used,
            ..entry.clone()
        });
    }

    Ok(WithdrawalPlan {
        requested: apply_amount,
        available,
        updated_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(id: i64, year: i32, amount: Decimal) -> BankEntry {
        BankEntry {
            id,
            ship_id: "S1".to_string(),
            year,
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_deposit() {
        let new = validate_deposit("S1", 2024, dec!(100)).unwrap();
        assert_eq!(new.amount, dec!(100));

        assert!(validate_deposit("S1", 2024, Decimal::ZERO).unwrap_err().is_validation());
        assert!(validate_deposit("S1", 2024, dec!(-5)).unwrap_err().is_validation());
        assert!(validate_deposit("", 2024, dec!(5)).unwrap_err().is_validation());
        assert!(validate_deposit("S1", 0, dec!(5)).unwrap_err().is_validation());
    }

    #[test]
    fn test_fifo_consumes_everything() {
        let entries = vec![entry(2, 2024, dec!(50)), entry(1, 2023, dec!(100))];

        let plan = plan_withdrawal("S1", &entries, dec!(150)).unwrap();

        assert_eq!(plan.updated_entries.len(), 2);
        assert_eq!(plan.updated_entries[0].year, 2023);
        assert_eq!(plan.updated_entries[0].amount, Decimal::ZERO);
        assert_eq!(plan.updated_entries[1].year, 2024);
        assert_eq!(plan.updated_entries[1].amount, Decimal::ZERO);
        assert_eq!(plan.available, dec!(150));
    }

    #[test]
    fn test_fifo_oldest_year_first() {
        let entries = vec![
            entry(1, 2025, dec!(30)),
            entry(2, 2023, dec!(40)),
            entry(3, 2024, dec!(50)),
        ];

        let plan = plan_withdrawal("S1", &entries, dec!(60)).unwrap();

        // 2023 hết (40), 2024 còn 30, 2025 không đụng tới
        assert_eq!(plan.updated_entries.len(), 2);
        assert_eq!(plan.updated_entries[0].id, 2);
        assert_eq!(plan.updated_entries[0].amount, Decimal::ZERO);
        assert_eq!(plan.updated_entries[1].id, 3);
        assert_eq!(plan.updated_entries[1].amount, dec!(30));
    }

    #[test]
    fn test_same_year_ordered_by_entry_id() {
        let entries = vec![entry(7, 2024, dec!(10)), entry(4, 2024, dec!(10))];

        let plan = plan_withdrawal("S1", &entries, dec!(5)).unwrap();
        assert_eq!(plan.updated_entries.len(), 1);
        assert_eq!(plan.updated_entries[0].id, 4);
        assert_eq!(plan.updated_entries[0].amount, dec!(5));
    }

    #[test]
    fn test_insufficient_balance() {
        let entries = vec![entry(1, 2023, dec!(60)), entry(2, 2024, dec!(40))];

        let err = plan_withdrawal("S1", &entries, dec!(150)).unwrap_err();
        assert!(err.is_business_rule());
        assert!(err.to_string().contains("Insufficient"));
        // input không đổi
        assert_eq!(banked_balance(&entries).unwrap(), dec!(100));
    }

    #[test]
    fn test_overflowing_ledger_is_business_rule() {
        let entries = vec![entry(1, 2023, Decimal::MAX), entry(2, 2024, Decimal::MAX)];

        assert!(banked_balance(&entries).unwrap_err().is_business_rule());

        let err = plan_withdrawal("S1", &entries, dec!(10)).unwrap_err();
        assert!(err.is_business_rule());
        assert!(err.to_string().contains("Banked balance overflowed."));
    }

    #[test]
    fn test_no_entries_for_ship() {
        let entries = vec![entry(1, 2023, dec!(60))];
        let err = plan_withdrawal("S9", &entries, dec!(10)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_positive_apply_amount() {
        let entries = vec![entry(1, 2023, dec!(60))];
        let err = plan_withdrawal("S1", &entries, dec!(-100)).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_skips_exhausted_entries() {
        let entries = vec![entry(1, 2022, Decimal::ZERO), entry(2, 2023, dec!(25))];

        let plan = plan_withdrawal("S1", &entries, dec!(25)).unwrap();
        assert_eq!(plan.updated_entries.len(), 1);
        assert_eq!(plan.updated_entries[0].id, 2);
        assert!(plan.updated_entries.iter().all(|e| e.amount >= Decimal::ZERO));
    }
}
