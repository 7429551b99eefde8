//! Minimum-weight enforcement.
//!
//! Assets below the floor are raised to it and the shortfall is taken
//! proportionally from the remaining assets. The result is renormalized so the
//! weights always sum to one.

use rust_decimal::Decimal;
use tracing::debug;

/// Equal weights for `n` assets.
pub fn equal_weights(n: usize) -> Vec<Decimal> {
    if n == 0 {
        return Vec::new();
    }
    let weight = Decimal::ONE / Decimal::from(n);
    vec![weight; n]
}

/// Raise every weight to at least `min_weight`, shrinking the others to pay for it.
///
/// When `n × min_weight > 1` the floor cannot be met and equal weights are
/// returned. If the assets above the floor hold no more than the deficit they are
/// left as they are and only the final renormalization pulls the sum back to one.
pub fn enforce_min_weight(weights: &[Decimal], min_weight: Decimal) -> Vec<Decimal> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    if Decimal::from(n) * min_weight > Decimal::ONE {
        debug!(n, %min_weight, "Minimum weight infeasible, using equal weights");
        return equal_weights(n);
    }

    let below: Vec<usize> = (0..n).filter(|&i| weights[i] < min_weight).collect();
    if below.is_empty() {
        return weights.to_vec();
    }

    let deficit: Decimal = below.iter().map(|&i| min_weight - weights[i]).sum();

    let mut adjusted = weights.to_vec();
    for &i in &below {
        adjusted[i] = min_weight;
    }

    let above: Vec<usize> = (0..n).filter(|i| !below.contains(i)).collect();
    let above_total: Decimal = above.iter().map(|&i| weights[i]).sum();

    if above_total > deficit {
        let factor = (above_total - deficit) / above_total;
        for &i in &above {
            adjusted[i] *= factor;
        }
    }

    let total: Decimal = adjusted.iter().sum();
    if total <= Decimal::ZERO {
        return equal_weights(n);
    }

    debug!(
        raised = below.len(),
        %deficit,
        %above_total,
        "Redistributed weights to minimum"
    );

    adjusted.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(a: &[Decimal], b: &[Decimal]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < dec!(0.000000000001), "{x} != {y}");
        }
    }

    fn sum(weights: &[Decimal]) -> Decimal {
        weights.iter().sum()
    }

    // =========================================================================
    // Floor Enforcement Tests
    // =========================================================================

    #[test]
    fn test_weights_above_floor_unchanged() {
        let weights = vec![dec!(0.5), dec!(0.3), dec!(0.2)];
        assert_eq!(enforce_min_weight(&weights, dec!(0.10)), weights);
    }

    #[test]
    fn test_small_weight_raised_to_floor() {
        let weights = vec![dec!(0.95), dec!(0.05)];
        let adjusted = enforce_min_weight(&weights, dec!(0.10));

        // deficit = 0.05, above shrinks by (0.95 - 0.05) / 0.95
        assert_close(&adjusted, &[dec!(0.90), dec!(0.10)]);
        assert!((sum(&adjusted) - Decimal::ONE).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_multiple_below_floor() {
        let weights = vec![dec!(0.86), dec!(0.08), dec!(0.06)];
        let adjusted = enforce_min_weight(&weights, dec!(0.10));

        assert!(adjusted[1] >= dec!(0.0999999999));
        assert!(adjusted[2] >= dec!(0.0999999999));
        assert_close(&adjusted, &[dec!(0.80), dec!(0.10), dec!(0.10)]);
    }

    #[test]
    fn test_infeasible_floor_returns_equal_weights() {
        let weights = vec![dec!(0.5), dec!(0.2), dec!(0.1), dec!(0.1), dec!(0.1)];
        let adjusted = enforce_min_weight(&weights, dec!(0.25));

        assert_eq!(adjusted, equal_weights(5));
        assert_eq!(adjusted[0], Decimal::ONE / dec!(5));
    }

    #[test]
    fn test_deficit_larger_than_above_total_still_sums_to_one() {
        // Above assets cannot fund the deficit; only renormalization applies
        let weights = vec![dec!(0.15), dec!(0.01), dec!(0.01)];
        let adjusted = enforce_min_weight(&weights, dec!(0.10));

        // 0.15 + 0.10 + 0.10 = 0.35 before renormalization
        assert_close(
            &adjusted,
            &[dec!(0.15) / dec!(0.35), dec!(0.10) / dec!(0.35), dec!(0.10) / dec!(0.35)],
        );
        assert!((sum(&adjusted) - Decimal::ONE).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_empty_input() {
        assert!(enforce_min_weight(&[], dec!(0.10)).is_empty());
    }

    // =========================================================================
    // Idempotence Tests
    // =========================================================================

    #[test]
    fn test_idempotent_after_shrink() {
        let weights = vec![dec!(0.70), dec!(0.25), dec!(0.04), dec!(0.01)];
        let once = enforce_min_weight(&weights, dec!(0.10));
        let twice = enforce_min_weight(&once, dec!(0.10));

        assert_close(&once, &twice);
    }

    #[test]
    fn test_idempotent_when_floor_infeasible() {
        let weights = vec![dec!(0.4), dec!(0.3), dec!(0.2), dec!(0.1)];
        let once = enforce_min_weight(&weights, dec!(0.3));
        let twice = enforce_min_weight(&once, dec!(0.3));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_on_compliant_input() {
        let weights = equal_weights(3);
        let once = enforce_min_weight(&weights, dec!(0.10));
        assert_eq!(once, weights);
        assert_eq!(enforce_min_weight(&once, dec!(0.10)), once);
    }
}
