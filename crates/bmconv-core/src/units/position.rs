use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::{discretize, format_thousandths, parse_rational, ratio, require_non_negative};
use crate::error::{Error, Result};

/// Smallest representable fraction of a measure.
pub const POSITION_RESOLUTION: i64 = 192;

/// A position on the chart timeline, in measures.
///
/// Snapped to the nearest 1/192 of a measure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartPosition(BigRational);

impl ChartPosition {
    const UNIT: &'static str = "chart position";

    pub fn new(value: BigRational) -> Result<Self> {
        require_non_negative(Self::UNIT, &value)?;
        Ok(Self(discretize(&value, &ratio(1, POSITION_RESOLUTION))))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value = parse_rational(text).ok_or_else(|| Error::validation(Self::UNIT, text))?;
        Self::new(value)
    }

    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    /// Start of the given measure.
    pub fn from_measure(measure: u32) -> Self {
        Self(BigRational::from_integer(BigInt::from(measure)))
    }

    /// `measure + numer/denom`, where `numer/denom` must lie in `[0, 1)`.
    pub fn from_parts(measure: u32, numer: u32, denom: u32) -> Result<Self> {
        if denom == 0 || numer >= denom {
            return Err(Error::validation(
                Self::UNIT,
                format!("{}+{}/{}", measure, numer, denom),
            ));
        }
        Self::new(
            BigRational::from_integer(BigInt::from(measure))
                + ratio(i64::from(numer), i64::from(denom)),
        )
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }

    /// Index of the measure containing this position.
    pub fn measure_index(&self) -> u32 {
        self.0.floor().to_integer().to_u32().unwrap_or(u32::MAX)
    }

    /// Offset from the start of the containing measure, always in `[0, 1)`.
    pub fn local_offset(&self) -> BigRational {
        self.0.fract()
    }

    pub fn to_beat(&self) -> Beat {
        Beat::from_position(self)
    }
}

impl fmt::Display for ChartPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position in beats (4 per measure), used for serialization only.
///
/// The target format accepts thousandths but only resolves 1/48 of a beat,
/// so the value is snapped to 1/48 first and to 1/1000 second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Beat(BigRational);

impl Beat {
    pub fn from_position(position: &ChartPosition) -> Self {
        let beats = position.value() * BigRational::from_integer(BigInt::from(4u32));
        let snapped = discretize(&beats, &ratio(1, 48));
        Self(discretize(&snapped, &ratio(1, 1000)))
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_thousandths(&self.0))
    }
}
