use num_bigint::BigInt;
use num_rational::BigRational;

use super::DefId;
use crate::error::{Error, Result};
use crate::units::ChartPosition;

/// One channel event as written in the chart.
///
/// The global position starts out as `measure + index/split` and is rewritten
/// once by the offset resolver when time signatures stretch measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDatum {
    value: DefId,
    measure: u32,
    index: u32,
    split: u32,
    position: ChartPosition,
}

impl RawDatum {
    pub fn new(value: DefId, measure: u32, index: u32, split: u32) -> Result<Self> {
        let position = ChartPosition::from_parts(measure, index, split)?;
        Ok(Self {
            value,
            measure,
            index,
            split,
            position,
        })
    }

    /// Split a channel message into one datum per two-character slot.
    ///
    /// The measure is divided into as many equal parts as there are slots.
    /// Empty (`00`) slots are dropped unless `keep_rests` is set.
    pub fn from_message(message: &str, measure: u32, keep_rests: bool) -> Result<Vec<Self>> {
        let message = message.trim();
        if message.len() < 2 || !message.is_ascii() {
            return Err(Error::validation("channel message", message));
        }

        let slots: Vec<&str> = message
            .as_bytes()
            .chunks_exact(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .collect();
        let split = u32::try_from(slots.len()).map_err(|_| Error::validation("channel message", message))?;

        let mut datums = Vec::with_capacity(slots.len());
        for (index, slot) in (0u32..).zip(slots) {
            let value = DefId::parse(slot)?;
            if value.is_rest() && !keep_rests {
                continue;
            }
            datums.push(Self::new(value, measure, index, split)?);
        }
        Ok(datums)
    }

    pub fn value(&self) -> DefId {
        self.value
    }

    /// Measure the datum was declared in.
    pub fn measure(&self) -> u32 {
        self.measure
    }

    /// Exact offset inside the declared measure, `index / split`.
    pub fn local_offset(&self) -> BigRational {
        BigRational::new(BigInt::from(self.index), BigInt::from(self.split))
    }

    /// Position on the (possibly rescaled) chart timeline.
    pub fn position(&self) -> &ChartPosition {
        &self.position
    }

    pub(crate) fn relocate(&mut self, position: ChartPosition) {
        self.position = position;
    }
}
