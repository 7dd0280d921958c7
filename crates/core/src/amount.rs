//! Checked Decimal arithmetic.
//!
//! `Decimal` panic khi tràn (`*`, `+`, `Iterator::sum`). Các phép tính trên
//! input của caller đi qua đây: tích tràn là lỗi input (`Validation`), tổng
//! tràn là lỗi business (`BusinessRule`).

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;

/// `a × b`; tràn thì `Validation` với tên đại lượng `what`
pub fn checked_product(a: Decimal, b: Decimal, what: &str) -> CoreResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| CoreError::validation(format!("{} is out of range.", what)))
}

/// `a + b`; tràn thì `BusinessRule`
pub fn checked_total(a: Decimal, b: Decimal, what: &str) -> CoreResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::business_rule(format!("{} overflowed.", what)))
}

/// Tổng các giá trị; tràn thì `BusinessRule`
pub fn checked_sum<I>(values: I, what: &str) -> CoreResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_total(acc, v, what))
}
