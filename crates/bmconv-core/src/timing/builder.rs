use std::collections::{BTreeMap, HashSet};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed};
use tracing::debug;

use super::table::SealedTimingTable;
use crate::error::{Error, Result};
use crate::units::{Bpm, ChartPosition, MeasureRatio, PauseDuration, POSITION_RESOLUTION};

/// Accumulates timing events while the chart is being read.
///
/// Events can be added in any order. Once everything is in, `seal` turns the
/// builder into a `SealedTimingTable`; the builder is consumed, so nothing
/// can be added afterwards and nothing can be queried before.
#[derive(Debug, Clone)]
pub struct OpenTimingBuilder {
    tempo_changes: Vec<(ChartPosition, Bpm)>,
    pauses: Vec<(ChartPosition, PauseDuration)>,
    time_signatures: BTreeMap<u32, MeasureRatio>,
}

impl OpenTimingBuilder {
    /// Create a builder with `initial_bpm` in effect from position 0.
    pub fn new(initial_bpm: Bpm) -> Self {
        Self {
            tempo_changes: vec![(ChartPosition::zero(), initial_bpm)],
            pauses: Vec::new(),
            time_signatures: BTreeMap::new(),
        }
    }

    pub fn add_tempo_change(&mut self, position: ChartPosition, bpm: Bpm) {
        self.tempo_changes.push((position, bpm));
    }

    pub fn add_pause(&mut self, position: ChartPosition, duration: PauseDuration) {
        self.pauses.push((position, duration));
    }

    /// Add a pause given in 1/192 measure units.
    ///
    /// The length is converted to milliseconds with the tempo in effect at
    /// `position`, rounding half to even.
    pub fn add_beat_pause(&mut self, position: ChartPosition, raw_units: u32) -> Result<()> {
        // new() always registers a tempo at position 0
        let bpm = self
            .tempo_at(&position)
            .cloned()
            .ok_or_else(|| Error::validation("BPM", "no tempo before pause"))?;

        let measures = BigRational::new(BigInt::from(raw_units), BigInt::from(POSITION_RESOLUTION));
        let millis = measures * bpm.seconds_per_measure() * BigRational::from_integer(BigInt::from(1000u32));
        let rounded = round_half_even(&millis);
        if !rounded.is_positive() {
            return Err(Error::PauseTooShort {
                bpm: bpm.to_string(),
                units: raw_units,
            });
        }

        debug!(
            "Beat pause of {}/192 at {} became {} ms (BPM {})",
            raw_units, position, rounded, bpm
        );
        self.add_pause(position, PauseDuration::new(BigRational::from_integer(rounded))?);
        Ok(())
    }

    /// Set the length ratio of `measure`. A later call for the same measure
    /// replaces the earlier one.
    pub fn add_time_signature_change(&mut self, measure: u32, ratio: MeasureRatio) {
        self.time_signatures.insert(measure, ratio);
    }

    pub fn time_signatures(&self) -> &BTreeMap<u32, MeasureRatio> {
        &self.time_signatures
    }

    /// Tempo of the closest change at or before `position`.
    ///
    /// When several changes share that position, the most recently added one
    /// is returned.
    pub fn tempo_at(&self, position: &ChartPosition) -> Option<&Bpm> {
        self.tempo_changes
            .iter()
            .filter(|(at, _)| at <= position)
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, bpm)| bpm)
    }

    pub fn seal(self) -> SealedTimingTable {
        let tempo_changes = keep_last_per_position(self.tempo_changes);
        let pauses = keep_last_per_position(self.pauses);
        debug!(
            "Sealing timing: {} tempo changes, {} pauses, {} time signatures",
            tempo_changes.len(),
            pauses.len(),
            self.time_signatures.len()
        );
        SealedTimingTable::build(tempo_changes, pauses, self.time_signatures)
    }
}

/// Drop every event that is followed by a later event at the same position,
/// then sort by position.
fn keep_last_per_position<T>(events: Vec<(ChartPosition, T)>) -> Vec<(ChartPosition, T)> {
    let mut seen = HashSet::new();
    let mut kept: Vec<_> = events
        .into_iter()
        .rev()
        .filter(|(position, _)| seen.insert(position.clone()))
        .collect();
    kept.sort_by(|(a, _), (b, _)| a.cmp(b));
    kept
}

fn round_half_even(value: &BigRational) -> BigInt {
    let floor = value.floor();
    let remainder = value - &floor;
    let floor = floor.to_integer();
    let half = BigRational::new(BigInt::one(), BigInt::from(2u32));
    match remainder.cmp(&half) {
        std::cmp::Ordering::Less => floor,
        std::cmp::Ordering::Greater => floor + 1,
        std::cmp::Ordering::Equal if floor.is_even() => floor,
        std::cmp::Ordering::Equal => floor + 1,
    }
}
