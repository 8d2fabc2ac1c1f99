use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::{discretize, ratio, require_non_negative};
use crate::error::Result;

/// Frame rate of the baked audio track; elapsed time is snapped to its frames.
pub const DEFAULT_FRAME_RATE: u32 = 44_100;

/// Elapsed seconds since the start of the chart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(BigRational);

impl Time {
    const UNIT: &'static str = "time";

    pub fn new(seconds: BigRational) -> Result<Self> {
        require_non_negative(Self::UNIT, &seconds)?;
        Ok(Self(discretize(
            &seconds,
            &ratio(1, i64::from(DEFAULT_FRAME_RATE)),
        )))
    }

    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    /// Snaps an elapsed time that is non-negative by construction.
    pub(crate) fn from_elapsed(seconds: &BigRational) -> Self {
        Self(discretize(seconds, &ratio(1, i64::from(DEFAULT_FRAME_RATE))))
    }

    pub fn seconds(&self) -> &BigRational {
        &self.0
    }

    /// Whole frames elapsed at `frame_rate`.
    pub fn to_frames(&self, frame_rate: u32) -> u64 {
        (&self.0 * BigRational::from_integer(BigInt::from(frame_rate)))
            .floor()
            .to_integer()
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::MAX)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}
