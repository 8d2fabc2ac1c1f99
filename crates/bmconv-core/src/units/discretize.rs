use num_rational::BigRational;
use num_traits::Signed;

/// Snaps `value` to the closest multiple of `step`.
///
/// Candidates are evaluated in the order floor multiple, one step below it,
/// one step above it; the first candidate with the smallest distance wins, so
/// an exact tie between two multiples always resolves downwards.
pub fn discretize(value: &BigRational, step: &BigRational) -> BigRational {
    let floor = (value / step).floor() * step;
    let candidates = [floor.clone(), &floor - step, &floor + step];

    let mut best = &candidates[0];
    let mut best_distance = (value - best).abs();
    for candidate in &candidates[1..] {
        let distance = (value - candidate).abs();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn test_exact_multiple_is_kept() {
        assert_eq!(discretize(&ratio(3, 192), &ratio(1, 192)), ratio(3, 192));
    }

    #[test]
    fn test_snaps_to_nearest() {
        // 1/3 is closer to 333/1000 than to 334/1000
        assert_eq!(discretize(&ratio(1, 3), &ratio(1, 1000)), ratio(333, 1000));
        // 2/3 is closer to 667/1000
        assert_eq!(discretize(&ratio(2, 3), &ratio(1, 1000)), ratio(667, 1000));
    }

    #[test]
    fn test_tie_resolves_to_floor() {
        // 1/384 is exactly between 0 and 1/192
        assert_eq!(discretize(&ratio(1, 384), &ratio(1, 192)), ratio(0, 1));
        assert_eq!(discretize(&ratio(3, 384), &ratio(1, 192)), ratio(1, 192));
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(discretize(&ratio(-1, 3), &ratio(1, 2)), ratio(-1, 2));
    }
}
