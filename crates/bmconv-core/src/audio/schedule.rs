use super::SampleId;
use crate::units::Time;

/// One keysound instance: which sample plays, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSound {
    pub sample: SampleId,
    pub start: Time,
}

impl ScheduledSound {
    pub fn new(sample: SampleId, start: Time) -> Self {
        Self { sample, start }
    }

    /// Frames covered by this sound when its sample lasts `duration` frames.
    pub fn span(&self, frame_rate: u32, duration: u64) -> FrameSpan {
        FrameSpan {
            start: self.start.to_frames(frame_rate),
            duration,
        }
    }
}

/// Half-open range of output frames `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameSpan {
    pub start: u64,
    pub duration: u64,
}

impl FrameSpan {
    pub fn end(&self) -> u64 {
        self.start + self.duration
    }

    pub fn overlaps(&self, other: &FrameSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{ratio, DEFAULT_FRAME_RATE};

    #[test]
    fn test_span_in_frames() {
        let sound = ScheduledSound::new(SampleId(0), Time::new(ratio(1, 2)).unwrap());
        let span = sound.span(DEFAULT_FRAME_RATE, 100);
        assert_eq!(span.start, 22_050);
        assert_eq!(span.end(), 22_150);
    }

    #[test]
    fn test_overlaps() {
        let a = FrameSpan { start: 0, duration: 10 };
        let b = FrameSpan { start: 10, duration: 5 };
        let c = FrameSpan { start: 9, duration: 1 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(!b.overlaps(&c));
    }
}
