use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use super::PcmBuffer;
use crate::error::Result;

fn spec_for(buffer: &PcmBuffer) -> WavSpec {
    WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Encode `buffer` as 16-bit WAV into `writer`.
pub fn encode_wav<W: Write + Seek>(writer: W, buffer: &PcmBuffer) -> Result<()> {
    let wav = WavWriter::new(writer, spec_for(buffer))?;
    write_samples(wav, buffer)
}

fn write_samples<W: Write + Seek>(mut wav: WavWriter<W>, buffer: &PcmBuffer) -> Result<()> {
    for &sample in buffer.samples() {
        wav.write_sample(sample)?;
    }
    wav.finalize()?;
    Ok(())
}

/// Write `buffer` to a 16-bit WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &PcmBuffer) -> Result<()> {
    let path = path.as_ref();
    let wav = WavWriter::create(path, spec_for(buffer))?;
    write_samples(wav, buffer)?;
    info!("Wrote {} frames to {}", buffer.frames(), path.display());
    Ok(())
}
