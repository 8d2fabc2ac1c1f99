//! Validated rational units.
//!
//! Every quantity that ends up on the chart timeline is an exact rational:
//! - `ChartPosition` / `Beat` - positions in measures and in beats
//! - `Bpm`, `PauseDuration`, `MeasureRatio` - timing event payloads
//! - `Time` - elapsed seconds, snapped to output frames
//!
//! Each constructor validates its input and snaps it to the unit's
//! resolution, failing with `Error::Validation` naming the unit.

mod discretize;
mod position;
mod time;
mod timing;

pub use discretize::discretize;
pub use position::*;
pub use time::*;
pub use timing::*;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Parses an integer, a decimal (`0.75`, `1e3`) or a ratio (`3/4`).
pub fn parse_rational(text: &str) -> Option<BigRational> {
    let text = text.trim();
    if let Some((numer, denom)) = text.split_once('/') {
        let numer = parse_integer(numer.trim())?;
        let denom = parse_integer(denom.trim())?;
        if denom.is_zero() {
            return None;
        }
        return Some(BigRational::new(numer, denom));
    }

    let (negative, body) = split_sign(text);
    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&body[..i], body[i + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .bytes()
        .chain(frac_part.bytes())
        .all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let numer: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = exponent.checked_sub(i32::try_from(frac_part.len()).ok()?)?;
    let ten = BigInt::from(10u32);
    let value = if scale >= 0 {
        BigRational::from_integer(numer * num_traits::pow(ten, scale as usize))
    } else {
        BigRational::new(numer, num_traits::pow(ten, scale.unsigned_abs() as usize))
    };
    Some(if negative { -value } else { value })
}

fn parse_integer(text: &str) -> Option<BigInt> {
    let (negative, digits) = split_sign(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: BigInt = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

pub(crate) fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

pub(crate) fn require_non_negative(unit: &'static str, value: &BigRational) -> Result<()> {
    if value.is_negative() {
        return Err(Error::validation(unit, value));
    }
    Ok(())
}

pub(crate) fn require_positive(unit: &'static str, value: &BigRational) -> Result<()> {
    if !value.is_positive() {
        return Err(Error::validation(unit, value));
    }
    Ok(())
}

/// Formats a value as `integer.thousandths`, rounding to the nearest 1/1000.
pub fn format_thousandths(value: &BigRational) -> String {
    let scaled = (value * BigRational::from_integer(BigInt::from(1000u32)))
        .round()
        .to_integer();
    let (negative, scaled) = (scaled.is_negative(), scaled.abs());
    let whole = &scaled / 1000u32;
    let fraction = (&scaled % 1000u32).to_u32().unwrap_or(0);
    format!(
        "{}{}.{:03}",
        if negative { "-" } else { "" },
        whole,
        fraction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_and_decimal() {
        assert_eq!(parse_rational("120"), Some(ratio(120, 1)));
        assert_eq!(parse_rational("0.75"), Some(ratio(3, 4)));
        assert_eq!(parse_rational(".5"), Some(ratio(1, 2)));
        assert_eq!(parse_rational("-1.25"), Some(ratio(-5, 4)));
        assert_eq!(parse_rational("1.5e2"), Some(ratio(150, 1)));
        assert_eq!(parse_rational("25e-2"), Some(ratio(1, 4)));
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_rational("3/4"), Some(ratio(3, 4)));
        assert_eq!(parse_rational(" 6 / 8 "), Some(ratio(3, 4)));
        assert_eq!(parse_rational("1/0"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_rational(""), None);
        assert_eq!(parse_rational("."), None);
        assert_eq!(parse_rational("12a"), None);
        assert_eq!(parse_rational("0x10"), None);
    }

    #[test]
    fn test_format_thousandths() {
        assert_eq!(format_thousandths(&ratio(150, 1)), "150.000");
        assert_eq!(format_thousandths(&ratio(1, 3)), "0.333");
        assert_eq!(format_thousandths(&ratio(2501, 1000)), "2.501");
        assert_eq!(format_thousandths(&ratio(-1, 2)), "-0.500");
    }
}
