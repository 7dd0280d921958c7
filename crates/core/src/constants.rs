//! Regulatory constants.
//!
//! Giá trị mặc định; `RulesConfig` có thể override target và energy factor.

use rust_decimal::Decimal;

/// GHG intensity target (gCO2e/MJ).
pub const TARGET_INTENSITY: Decimal = Decimal::from_parts(893_368, 0, 0, false, 4);

/// Energy content per unit of fuel consumed (MJ).
pub const ENERGY_FACTOR: Decimal = Decimal::from_parts(41_000, 0, 0, false, 0);

/// Grams per tonne, cho chuyển đổi total emissions (t) sang gram.
pub const GRAMS_PER_TONNE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Số chữ số thập phân của CB value.
pub const CB_DECIMALS: u32 = 6;

/// Số chữ số thập phân của percent diff trong comparison.
pub const PERCENT_DECIMALS: u32 = 3;

/// Năm sớm nhất được chấp nhận cho một route.
pub const MIN_YEAR: i32 = 2020;

/// Số năm sau năm hiện tại vẫn được chấp nhận.
pub const MAX_YEAR_OFFSET: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constant_values() {
        assert_eq!(TARGET_INTENSITY, dec!(89.3368));
        assert_eq!(ENERGY_FACTOR, dec!(41000));
        assert_eq!(GRAMS_PER_TONNE, dec!(1000000));
    }
}
