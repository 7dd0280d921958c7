//! Comparison engine
//!
//! So sánh GHG intensity của từng route với baseline route.

use crate::amount::checked_product;
use crate::constants::PERCENT_DECIMALS;
use crate::error::{CoreError, CoreResult};
use crate::route::Route;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Một dòng so sánh candidate vs baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub route_id: String,
    pub baseline_intensity: Decimal,
    pub ghg_intensity: Decimal,
    /// ((candidate / baseline) - 1) × 100, 3 decimals
    pub percent_diff: Decimal,
    /// intensity <= target
    pub compliant: bool,
    /// intensity < baseline intensity
    pub improved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline: Route,
    pub comparisons: Vec<ComparisonRow>,
    pub target: Decimal,
}

/// So sánh mọi candidate (trừ chính baseline) với baseline.
///
/// Thứ tự output giữ nguyên thứ tự input.
///
/// # Errors
/// - `NotFound` khi không có baseline hoặc candidate set rỗng
/// - `Validation` khi route truyền vào không được đánh dấu baseline
pub fn compare_routes(
    baseline: Option<&Route>,
    candidates: &[Route],
    target: Decimal,
) -> CoreResult<ComparisonReport> {
    let baseline = baseline.ok_or_else(|| CoreError::not_found("Baseline route", "none"))?;
    if candidates.is_empty() {
        return Err(CoreError::not_found("Comparison routes", "empty set"));
    }
    if !baseline.is_baseline {
        return Err(CoreError::validation(
            "Baseline route must be marked as baseline.",
        ));
    }
    if baseline.ghg_intensity <= Decimal::ZERO {
        return Err(CoreError::validation(
            "Baseline GHG intensity must be positive.",
        ));
    }

    let comparisons = candidates
        .iter()
        .filter(|r| r.id != baseline.id)
        .map(|r| compare_one(baseline, r, target))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(ComparisonReport {
        baseline: baseline.clone(),
        comparisons,
        target,
    })
}

fn compare_one(baseline: &Route, candidate: &Route, target: Decimal) -> CoreResult<ComparisonRow> {
    let ratio = candidate
        .ghg_intensity
        .checked_div(baseline.ghg_intensity)
        .ok_or_else(|| CoreError::validation("Cannot divide by baseline intensity."))?;
    let percent_diff = checked_product(ratio - Decimal::ONE, Decimal::ONE_HUNDRED, "Percent difference")?
        .round_dp_with_strategy(PERCENT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);

    Ok(ComparisonRow {
        route_id: candidate.route_id.clone(),
        baseline_intensity: baseline.ghg_intensity,
        ghg_intensity: candidate.ghg_intensity,
        percent_diff,
        compliant: candidate.is_compliant(target),
        improved: candidate.ghg_intensity < baseline.ghg_intensity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TARGET_INTENSITY;
    use crate::route::fixtures::route;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_diff_and_flags() {
        let baseline = route(1, "R001", dec!(91.0), true);
        let other = route(2, "R002", dec!(88.0), false);

        let report =
            compare_routes(Some(&baseline), &[baseline.clone(), other], TARGET_INTENSITY).unwrap();

        assert_eq!(report.baseline.route_id, "R001");
        assert_eq!(report.target, TARGET_INTENSITY);
        assert_eq!(report.comparisons.len(), 1);

        let row = &report.comparisons[0];
        assert_eq!(row.route_id, "R002");
        // (88 / 91 - 1) × 100 = -3.2967...
        assert_eq!(row.percent_diff, dec!(-3.297));
        assert!(row.compliant);
        assert!(row.improved);
    }

    #[test]
    fn test_preserves_input_order() {
        let baseline = route(1, "R001", dec!(91.0), true);
        let candidates = vec![
            route(3, "R003", dec!(93.5), false),
            baseline.clone(),
            route(2, "R002", dec!(88.0), false),
            route(5, "R005", dec!(90.5), false),
        ];

        let report = compare_routes(Some(&baseline), &candidates, TARGET_INTENSITY).unwrap();
        let ids: Vec<_> = report.comparisons.iter().map(|c| c.route_id.as_str()).collect();
        assert_eq!(ids, vec!["R003", "R002", "R005"]);

        let worse = &report.comparisons[0];
        assert!(worse.percent_diff > Decimal::ZERO);
        assert!(!worse.improved);
        assert!(!worse.compliant);
    }

    #[test]
    fn test_intensity_equal_to_target_is_compliant() {
        let baseline = route(1, "R001", dec!(91.0), true);
        let on_target = route(2, "R002", TARGET_INTENSITY, false);

        let report = compare_routes(Some(&baseline), &[on_target], TARGET_INTENSITY).unwrap();
        assert!(report.comparisons[0].compliant);
        assert!(report.comparisons[0].improved);
    }

    #[test]
    fn test_missing_baseline() {
        let other = route(2, "R002", dec!(88.0), false);
        let err = compare_routes(None, &[other], TARGET_INTENSITY).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_candidates() {
        let baseline = route(1, "R001", dec!(91.0), true);
        let err = compare_routes(Some(&baseline), &[], TARGET_INTENSITY).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unmarked_baseline_rejected() {
        let not_baseline = route(1, "R001", dec!(91.0), false);
        let other = route(2, "R002", dec!(88.0), false);
        let err = compare_routes(Some(&not_baseline), &[other], TARGET_INTENSITY).unwrap_err();
        assert!(err.is_validation());
    }
}
