use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use super::PcmBuffer;
use crate::error::{Error, Result};

/// Decodes a sample file to 16-bit PCM.
///
/// This trait is the seam for audio codecs and for mocking in tests.
pub trait SampleDecoder {
    fn decode(&self, path: &Path) -> Result<PcmBuffer>;
}

/// Decoder for RIFF WAV files.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl SampleDecoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<PcmBuffer> {
        let reader = WavReader::open(path)?;
        decode_wav(reader, &path.display().to_string())
    }
}

/// Read every sample of `reader`, scaling integer and float formats to i16.
pub fn decode_wav<R: Read>(reader: WavReader<R>, name: &str) -> Result<PcmBuffer> {
    let spec = reader.spec();
    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ 1..=16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v << (16 - bits)))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (SampleFormat::Int, bits @ 17..=32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| (v >> (bits - 16)) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(Error::UnsupportedSampleFormat {
                sample: name.to_string(),
                message: format!("{:?} samples of {} bits", format, bits),
            });
        }
    };
    Ok(PcmBuffer::new(spec.channels, spec.sample_rate, samples))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::{WavSpec, WavWriter};

    use super::*;

    fn encode<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    fn spec(channels: u16, bits: u16, format: SampleFormat) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 22_050,
            bits_per_sample: bits,
            sample_format: format,
        }
    }

    #[test]
    fn test_decode_16_bit() {
        let bytes = encode(spec(2, 16, SampleFormat::Int), &[1i16, -1, 300, -300]);
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let buffer = decode_wav(reader, "test").unwrap();
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate(), 22_050);
        assert_eq!(buffer.samples(), &[1, -1, 300, -300]);
    }

    #[test]
    fn test_decode_8_bit_is_scaled_up() {
        let bytes = encode(spec(1, 8, SampleFormat::Int), &[1i8, -128]);
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let buffer = decode_wav(reader, "test").unwrap();
        assert_eq!(buffer.samples(), &[256, i16::MIN]);
    }

    #[test]
    fn test_decode_24_bit_is_scaled_down() {
        let bytes = encode(spec(1, 24, SampleFormat::Int), &[256i32, -8_388_608]);
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let buffer = decode_wav(reader, "test").unwrap();
        assert_eq!(buffer.samples(), &[1, i16::MIN]);
    }

    #[test]
    fn test_decode_float() {
        let bytes = encode(spec(1, 32, SampleFormat::Float), &[0.5f32, -2.0]);
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let buffer = decode_wav(reader, "test").unwrap();
        assert_eq!(buffer.samples(), &[16_383, -i16::MAX]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WavDecoder.decode(&dir.path().join("missing.wav"));
        assert!(result.is_err());
    }
}
