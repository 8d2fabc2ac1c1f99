use super::PcmBuffer;

/// Channel count and frame rate shared by every sample in one mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

impl MixFormat {
    /// Bring `buffer` to this format: mono is duplicated to stereo and the
    /// frame rate is converted by linear interpolation.
    ///
    /// `buffer` must have at most `self.channels` channels.
    pub fn conform(&self, buffer: &PcmBuffer) -> PcmBuffer {
        let widened = if buffer.channels() < self.channels {
            upmix(buffer, self.channels)
        } else {
            buffer.clone()
        };
        if widened.sample_rate() == self.sample_rate {
            widened
        } else {
            resample_linear(&widened, self.sample_rate)
        }
    }
}

/// Repeat the single channel of a mono buffer on every output channel.
fn upmix(buffer: &PcmBuffer, channels: u16) -> PcmBuffer {
    let width = usize::from(channels);
    let mut samples = Vec::with_capacity(buffer.frames() * width);
    for frame in 0..buffer.frames() {
        let value = buffer.frame(frame)[0];
        samples.extend(std::iter::repeat_n(value, width));
    }
    PcmBuffer::new(channels, buffer.sample_rate(), samples)
}

pub fn resample_linear(buffer: &PcmBuffer, target_rate: u32) -> PcmBuffer {
    let source_rate = buffer.sample_rate();
    let frames = buffer.frames();
    if frames == 0 || source_rate == target_rate || source_rate == 0 {
        return PcmBuffer::new(buffer.channels(), target_rate, buffer.samples().to_vec());
    }

    let out_frames = ((frames as u64 * u64::from(target_rate)) / u64::from(source_rate)).max(1) as usize;
    let width = usize::from(buffer.channels());
    let step = f64::from(source_rate) / f64::from(target_rate);
    let last = frames - 1;

    let mut samples = Vec::with_capacity(out_frames * width);
    for i in 0..out_frames {
        let position = i as f64 * step;
        let left = (position.floor() as usize).min(last);
        let right = (left + 1).min(last);
        let weight = position - left as f64;
        for channel in 0..width {
            let a = f64::from(buffer.frame(left)[channel]);
            let b = f64::from(buffer.frame(right)[channel]);
            let value = (a + (b - a) * weight).round();
            samples.push(value.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16);
        }
    }
    PcmBuffer::new(buffer.channels(), target_rate, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upmix_mono_to_stereo() {
        let format = MixFormat {
            channels: 2,
            sample_rate: 44_100,
        };
        let mono = PcmBuffer::new(1, 44_100, vec![1, -2, 3]);
        let stereo = format.conform(&mono);
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.samples(), &[1, 1, -2, -2, 3, 3]);
    }

    #[test]
    fn test_matching_format_is_unchanged() {
        let format = MixFormat {
            channels: 1,
            sample_rate: 44_100,
        };
        let buffer = PcmBuffer::new(1, 44_100, vec![5, 6, 7]);
        assert_eq!(format.conform(&buffer), buffer);
    }

    #[test]
    fn test_upsample_interpolates() {
        let buffer = PcmBuffer::new(1, 1, vec![0, 100]);
        let resampled = resample_linear(&buffer, 2);
        assert_eq!(resampled.sample_rate(), 2);
        assert_eq!(resampled.samples(), &[0, 50, 100, 100]);
    }

    #[test]
    fn test_downsample_halves_frames() {
        let buffer = PcmBuffer::new(2, 88_200, vec![10, -10, 20, -20, 30, -30, 40, -40]);
        let resampled = resample_linear(&buffer, 44_100);
        assert_eq!(resampled.frames(), 2);
        assert_eq!(resampled.samples(), &[10, -10, 30, -30]);
    }
}
