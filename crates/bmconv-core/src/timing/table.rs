use std::collections::BTreeMap;

use num_rational::BigRational;
use num_traits::Zero;

use crate::units::{Bpm, ChartPosition, MeasureRatio, PauseDuration, Time};

#[derive(Debug, Clone)]
struct TempoSegment {
    from: ChartPosition,
    bpm: Bpm,
    seconds_per_measure: BigRational,
    /// Tempo time elapsed when the segment starts
    elapsed: BigRational,
}

#[derive(Debug, Clone)]
struct PauseStep {
    position: ChartPosition,
    duration: PauseDuration,
    /// Sum of this pause and every earlier one, in seconds
    cumulative: BigRational,
}

/// Immutable timing of a chart, produced by `OpenTimingBuilder::seal`.
///
/// Elapsed time at a position is the sum of:
/// - for every tempo range `[from, to)`, the part of the range before the
///   position times `240 / bpm`;
/// - the duration of every pause located strictly before the position.
///
/// Both sums are precomputed per event so a lookup is a binary search.
#[derive(Debug, Clone)]
pub struct SealedTimingTable {
    tempo_segments: Vec<TempoSegment>,
    pauses: Vec<PauseStep>,
    time_signatures: BTreeMap<u32, MeasureRatio>,
}

impl SealedTimingTable {
    /// `tempo_changes` and `pauses` must be sorted by position with at most
    /// one event per position.
    pub(super) fn build(
        tempo_changes: Vec<(ChartPosition, Bpm)>,
        pauses: Vec<(ChartPosition, PauseDuration)>,
        time_signatures: BTreeMap<u32, MeasureRatio>,
    ) -> Self {
        let mut tempo_segments: Vec<TempoSegment> = Vec::with_capacity(tempo_changes.len());
        for (from, bpm) in tempo_changes {
            let elapsed = match tempo_segments.last() {
                Some(previous) => {
                    &previous.elapsed
                        + (from.value() - previous.from.value()) * &previous.seconds_per_measure
                }
                None => BigRational::zero(),
            };
            tempo_segments.push(TempoSegment {
                seconds_per_measure: bpm.seconds_per_measure(),
                from,
                bpm,
                elapsed,
            });
        }

        let mut total = BigRational::zero();
        let pauses = pauses
            .into_iter()
            .map(|(position, duration)| {
                total += duration.seconds();
                PauseStep {
                    position,
                    duration,
                    cumulative: total.clone(),
                }
            })
            .collect();

        Self {
            tempo_segments,
            pauses,
            time_signatures,
        }
    }

    /// Elapsed time at `position`, snapped to output frames.
    pub fn position_to_time(&self, position: &ChartPosition) -> Time {
        let mut seconds = self.tempo_seconds(position);
        let passed = self.pauses.partition_point(|p| p.position < *position);
        if passed > 0 {
            seconds += &self.pauses[passed - 1].cumulative;
        }
        Time::from_elapsed(&seconds)
    }

    fn tempo_seconds(&self, position: &ChartPosition) -> BigRational {
        let started = self.tempo_segments.partition_point(|s| s.from <= *position);
        match started.checked_sub(1).map(|i| &self.tempo_segments[i]) {
            Some(segment) => {
                &segment.elapsed
                    + (position.value() - segment.from.value()) * &segment.seconds_per_measure
            }
            // Before the first tempo change nothing has elapsed
            None => BigRational::zero(),
        }
    }

    /// Tempo in effect at `position`.
    pub fn tempo_at(&self, position: &ChartPosition) -> Option<&Bpm> {
        let started = self.tempo_segments.partition_point(|s| s.from <= *position);
        started
            .checked_sub(1)
            .map(|i| &self.tempo_segments[i].bpm)
    }

    pub fn tempo_changes(&self) -> impl Iterator<Item = (&ChartPosition, &Bpm)> {
        self.tempo_segments.iter().map(|s| (&s.from, &s.bpm))
    }

    pub fn pauses(&self) -> impl Iterator<Item = (&ChartPosition, &PauseDuration)> {
        self.pauses.iter().map(|p| (&p.position, &p.duration))
    }

    pub fn time_signatures(&self) -> &BTreeMap<u32, MeasureRatio> {
        &self.time_signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::OpenTimingBuilder;
    use crate::units::ratio;

    fn bpm(value: u32) -> Bpm {
        Bpm::from_integer(value).unwrap()
    }

    fn position(numer: i64, denom: i64) -> ChartPosition {
        ChartPosition::new(ratio(numer, denom)).unwrap()
    }

    #[test]
    fn test_constant_tempo() {
        let table = OpenTimingBuilder::new(bpm(120)).seal();
        assert_eq!(table.position_to_time(&position(0, 1)), Time::zero());
        assert_eq!(table.position_to_time(&position(1, 1)).seconds(), &ratio(2, 1));
        assert_eq!(table.position_to_time(&position(1, 4)).seconds(), &ratio(1, 2));
    }

    #[test]
    fn test_tempo_change_accumulates_ranges() {
        let mut builder = OpenTimingBuilder::new(bpm(120));
        builder.add_tempo_change(position(1, 1), bpm(240));
        let table = builder.seal();

        // 2s for the first measure, then 1s per measure
        assert_eq!(table.position_to_time(&position(1, 1)).seconds(), &ratio(2, 1));
        assert_eq!(table.position_to_time(&position(3, 1)).seconds(), &ratio(4, 1));
        assert_eq!(table.position_to_time(&position(3, 2)).seconds(), &ratio(5, 2));
    }

    #[test]
    fn test_pause_is_a_step_after_its_position() {
        let mut builder = OpenTimingBuilder::new(bpm(150));
        builder.add_pause(position(2, 1), PauseDuration::from_millis(500));
        let table = builder.seal();

        assert_eq!(table.position_to_time(&position(2, 1)).seconds(), &ratio(16, 5));
        // one 192nd later: 3.2 + 0.5 + 1.6/192
        let after = table.position_to_time(&position(385, 192));
        let expected = ratio(16, 5) + ratio(1, 2) + ratio(16, 10) * ratio(1, 192);
        assert_eq!(after, Time::new(expected).unwrap());
        assert!(after.seconds() > &ratio(37, 10));
    }

    #[test]
    fn test_later_tempo_at_same_position_wins() {
        let mut builder = OpenTimingBuilder::new(bpm(120));
        builder.add_tempo_change(position(1, 1), bpm(100));
        builder.add_tempo_change(position(1, 1), bpm(200));
        let table = builder.seal();

        assert_eq!(table.tempo_at(&position(1, 1)), Some(&bpm(200)));
        assert_eq!(table.tempo_changes().count(), 2);
    }

    #[test]
    fn test_later_pause_at_same_position_wins() {
        let mut builder = OpenTimingBuilder::new(bpm(120));
        builder.add_pause(position(1, 1), PauseDuration::from_millis(100));
        builder.add_pause(position(1, 1), PauseDuration::from_millis(300));
        let table = builder.seal();

        let pauses: Vec<_> = table.pauses().collect();
        assert_eq!(pauses, vec![(&position(1, 1), &PauseDuration::from_millis(300))]);
        assert_eq!(table.position_to_time(&position(2, 1)).seconds(), &ratio(43, 10));
    }

    #[test]
    fn test_initial_tempo_can_be_overridden() {
        let mut builder = OpenTimingBuilder::new(bpm(130));
        builder.add_tempo_change(ChartPosition::zero(), bpm(120));
        let table = builder.seal();
        assert_eq!(table.position_to_time(&position(1, 1)).seconds(), &ratio(2, 1));
    }

    #[test]
    fn test_time_is_non_decreasing() {
        let mut builder = OpenTimingBuilder::new(bpm(173));
        builder.add_tempo_change(position(3, 4), bpm(87));
        builder.add_tempo_change(position(5, 2), bpm(999));
        builder.add_pause(position(1, 1), PauseDuration::from_millis(250));
        builder.add_pause(position(5, 2), PauseDuration::from_millis(1));
        let table = builder.seal();

        let mut previous = Time::zero();
        for step in 0..(4 * 192) {
            let current = table.position_to_time(&position(step, 192));
            assert!(current >= previous, "time went backwards at {}/192", step);
            previous = current;
        }
    }
}
