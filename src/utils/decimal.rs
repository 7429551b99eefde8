//! Decimal arithmetic utilities for weight and notional calculations.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Round a decimal to a specific number of decimal places (banker's rounding).
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals)
}

/// Round a USD amount to cents.
pub fn round_usd(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// `part` as a percentage of `whole`, zero when `whole` is not positive.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part / whole * dec!(100)
}

/// Sum that reports overflow as `None`.
fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Arithmetic mean, `None` for an empty slice.
///
/// Values too large to sum directly are averaged as `Σ(v / n)`.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let n = Decimal::from(values.len());
    match checked_sum(values) {
        Some(sum) => Some(sum / n),
        None => checked_sum(&values.iter().map(|v| v / n).collect::<Vec<_>>()),
    }
}

/// Scale values so they sum to one. Returns `None` when the total is not positive
/// or does not fit in a `Decimal`.
pub fn normalize(values: &[Decimal]) -> Option<Vec<Decimal>> {
    let total = checked_sum(values)?;
    if total <= Decimal::ZERO {
        return None;
    }
    Some(values.iter().map(|v| v / total).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision_bankers() {
        assert_eq!(round_to_precision(dec!(0.33335), 4), dec!(0.3334));
        assert_eq!(round_to_precision(dec!(0.33345), 4), dec!(0.3334));
        assert_eq!(round_usd(dec!(1749.995)), dec!(1750.00));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(2500), dec!(20000)), dec!(12.5));
        assert_eq!(percent_of(dec!(2500), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[dec!(3), dec!(4)]), Some(dec!(3.5)));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_normalize() {
        let weights = normalize(&[dec!(1), dec!(3)]).unwrap();
        assert_eq!(weights, vec![dec!(0.25), dec!(0.75)]);
        assert!(normalize(&[Decimal::ZERO, Decimal::ZERO]).is_none());
    }

    #[test]
    fn test_mean_of_values_too_large_to_sum() {
        let big = Decimal::MAX / dec!(2) + dec!(1);
        let avg = mean(&[big, big]).unwrap();
        assert!((avg - big).abs() <= dec!(1));
    }

    #[test]
    fn test_normalize_overflowing_total() {
        assert!(normalize(&[Decimal::MAX, Decimal::MAX]).is_none());
    }
}
