/// Interleaved 16-bit PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Vec<i16>,
}

impl PcmBuffer {
    /// Wrap interleaved samples. A trailing incomplete frame is dropped.
    pub fn new(channels: u16, sample_rate: u32, mut samples: Vec<i16>) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % usize::from(channels);
        samples.truncate(whole);
        Self {
            channels,
            sample_rate,
            samples,
        }
    }

    pub fn silent(channels: u16, sample_rate: u32, frames: usize) -> Self {
        let channels = channels.max(1);
        Self {
            channels,
            sample_rate,
            samples: vec![0; frames * usize::from(channels)],
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples of one frame.
    pub fn frame(&self, index: usize) -> &[i16] {
        let width = usize::from(self.channels);
        &self.samples[index * width..(index + 1) * width]
    }
}
