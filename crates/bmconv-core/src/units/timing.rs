use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

use super::{
    discretize, format_thousandths, parse_rational, ratio, require_non_negative,
    require_positive,
};
use crate::error::{Error, Result};

/// Tempo in beats per minute, snapped to 1/1000.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bpm(BigRational);

impl Bpm {
    const UNIT: &'static str = "BPM";

    /// Fails for values that are not positive, and for values under 1/2000
    /// that snap to zero.
    pub fn new(value: BigRational) -> Result<Self> {
        require_positive(Self::UNIT, &value)?;
        let snapped = discretize(&value, &ratio(1, 1000));
        if !snapped.is_positive() {
            return Err(Error::validation(Self::UNIT, value));
        }
        Ok(Self(snapped))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value = parse_rational(text).ok_or_else(|| Error::validation(Self::UNIT, text))?;
        Self::new(value)
    }

    pub fn from_integer(value: u32) -> Result<Self> {
        Self::new(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }

    /// Seconds spent per measure: 4 beats of 60/bpm seconds each.
    pub fn seconds_per_measure(&self) -> BigRational {
        BigRational::from_integer(BigInt::from(240u32)) / &self.0
    }
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_thousandths(&self.0))
    }
}

/// A pause in milliseconds, snapped to whole milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PauseDuration(BigRational);

impl PauseDuration {
    const UNIT: &'static str = "pause duration";

    pub fn new(millis: BigRational) -> Result<Self> {
        require_non_negative(Self::UNIT, &millis)?;
        Ok(Self(discretize(&millis, &ratio(1, 1))))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value = parse_rational(text).ok_or_else(|| Error::validation(Self::UNIT, text))?;
        Self::new(value)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(BigRational::from_integer(BigInt::from(millis)))
    }

    pub fn millis(&self) -> &BigRational {
        &self.0
    }

    pub fn seconds(&self) -> BigRational {
        &self.0 / BigRational::from_integer(BigInt::from(1000u32))
    }
}

impl fmt::Display for PauseDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Length of a measure relative to the nominal length of 1.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasureRatio(BigRational);

impl MeasureRatio {
    const UNIT: &'static str = "time signature";

    pub fn new(value: BigRational) -> Result<Self> {
        require_positive(Self::UNIT, &value)?;
        Ok(Self(value))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value = parse_rational(text).ok_or_else(|| Error::validation(Self::UNIT, text))?;
        Self::new(value)
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }
}

impl fmt::Display for MeasureRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
