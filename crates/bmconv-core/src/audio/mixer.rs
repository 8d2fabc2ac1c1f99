use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::{FrameSpan, MixFormat, PcmBuffer, SampleBank, SampleDecoder, SampleId, ScheduledSound};
use crate::error::{Error, Result};
use crate::units::DEFAULT_FRAME_RATE;

/// Mix every scheduled sound into one track at `DEFAULT_FRAME_RATE`.
///
/// Sounds are laid out on passes in which no two sounds overlap; the passes
/// are then summed in order with saturation. The output is stereo if any
/// scheduled sample is stereo, mono otherwise.
pub fn bake(
    sounds: &[ScheduledSound],
    bank: &SampleBank,
    decoder: &dyn SampleDecoder,
) -> Result<PcmBuffer> {
    if sounds.is_empty() {
        return Err(Error::EmptyChart);
    }

    let synced = sync_samples(sounds, bank, decoder)?;
    let channels = synced
        .values()
        .next()
        .map(|pcm| pcm.channels())
        .unwrap_or(1);

    let mut placed = Vec::with_capacity(sounds.len());
    let mut spans = Vec::with_capacity(sounds.len());
    for sound in sounds {
        let pcm = &synced[&sound.sample];
        if pcm.is_empty() {
            continue;
        }
        placed.push(pcm);
        spans.push(sound.span(DEFAULT_FRAME_RATE, pcm.frames() as u64));
    }

    let total_frames = spans.iter().map(FrameSpan::end).max().unwrap_or(0);
    let mut output = PcmBuffer::silent(channels, DEFAULT_FRAME_RATE, total_frames as usize);
    let width = usize::from(channels);

    let passes = pack_passes(&spans);
    for (number, pass) in passes.iter().enumerate() {
        info!(
            "Mixing pass #{}: {} sounds ({} frames total)",
            number + 1,
            pass.len(),
            total_frames
        );
        // Sounds of one pass never overlap, so adding them one by one equals
        // adding the padded pass buffer
        let out = output.samples_mut();
        for &index in pass {
            let offset = spans[index].start as usize * width;
            for (target, &sample) in out[offset..].iter_mut().zip(placed[index].samples()) {
                *target = target.saturating_add(sample);
            }
        }
    }

    info!(
        "Baked {} sounds on {} passes into {:.3}s of audio",
        spans.len(),
        passes.len(),
        total_frames as f64 / f64::from(DEFAULT_FRAME_RATE)
    );
    Ok(output)
}

/// Decode every distinct sample once and bring them to a common format.
fn sync_samples(
    sounds: &[ScheduledSound],
    bank: &SampleBank,
    decoder: &dyn SampleDecoder,
) -> Result<BTreeMap<SampleId, PcmBuffer>> {
    let ids: BTreeSet<SampleId> = sounds.iter().map(|s| s.sample).collect();

    let mut decoded = Vec::with_capacity(ids.len());
    for id in ids {
        let pcm = bank.load(id, decoder)?;
        if pcm.channels() > 2 {
            let name = bank
                .get(id)
                .map(|s| s.def_id().to_string())
                .unwrap_or_default();
            return Err(Error::UnsupportedSampleFormat {
                sample: name,
                message: format!("{} channels", pcm.channels()),
            });
        }
        decoded.push((id, pcm));
    }

    let format = MixFormat {
        channels: decoded
            .iter()
            .map(|(_, pcm)| pcm.channels())
            .max()
            .unwrap_or(1),
        sample_rate: DEFAULT_FRAME_RATE,
    };
    debug!(
        "Syncing {} samples to {} channels at {} Hz",
        decoded.len(),
        format.channels,
        format.sample_rate
    );

    Ok(decoded
        .into_iter()
        .map(|(id, pcm)| (id, format.conform(pcm)))
        .collect())
}

/// Assign spans to passes so that spans of one pass never overlap.
///
/// Each pass scans the remaining spans by start frame, then duration, and
/// takes every span starting at or after the end of the last one it took.
/// Returns indices into `spans`, one list per pass.
pub fn pack_passes(spans: &[FrameSpan]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..spans.len()).collect();
    remaining.sort_by_key(|&i| (spans[i].start, spans[i].duration));

    let mut passes = Vec::new();
    while !remaining.is_empty() {
        let mut cursor = 0;
        let mut pass = Vec::new();
        let mut deferred = Vec::new();
        for index in remaining {
            if spans[index].start >= cursor {
                cursor = spans[index].end();
                pass.push(index);
            } else {
                deferred.push(index);
            }
        }
        debug!("Pass #{}: {} placed, {} deferred", passes.len() + 1, pass.len(), deferred.len());
        passes.push(pass);
        remaining = deferred;
    }
    passes
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::audio::MockDecoder;
    use crate::chart::DefId;
    use crate::units::{ratio, Time};

    fn span(start: u64, duration: u64) -> FrameSpan {
        FrameSpan { start, duration }
    }

    fn at_frame(frame: i64) -> Time {
        Time::new(ratio(frame, i64::from(DEFAULT_FRAME_RATE))).unwrap()
    }

    #[test]
    fn test_pack_passes_example() {
        let spans = [span(0, 20), span(10, 5), span(5, 3)];
        let passes = pack_passes(&spans);
        assert_eq!(passes, vec![vec![0], vec![2, 1]]);
    }

    #[test]
    fn test_pack_passes_ties_prefer_shorter() {
        let spans = [span(0, 10), span(0, 2), span(2, 2)];
        let passes = pack_passes(&spans);
        assert_eq!(passes, vec![vec![1, 2], vec![0]]);
    }

    #[test]
    fn test_pack_passes_empty() {
        assert!(pack_passes(&[]).is_empty());
    }

    #[test]
    fn test_bake_requires_sounds() {
        let bank = SampleBank::new();
        let err = bake(&[], &bank, &MockDecoder::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyChart));
    }

    #[test]
    fn test_bake_mixes_overlapping_sounds() {
        let decoder = MockDecoder::new()
            .with_sample("a.wav", PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![100, 100, 100]))
            .with_sample("b.wav", PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![10, 10]));
        let mut bank = SampleBank::new();
        let a = bank.define(DefId::parse("0A").unwrap(), PathBuf::from("a.wav"));
        let b = bank.define(DefId::parse("0B").unwrap(), PathBuf::from("b.wav"));

        let sounds = [
            ScheduledSound::new(a, at_frame(0)),
            ScheduledSound::new(b, at_frame(2)),
            ScheduledSound::new(a, at_frame(3)),
        ];
        let track = bake(&sounds, &bank, &decoder).unwrap();

        assert_eq!(track.channels(), 1);
        assert_eq!(track.sample_rate(), DEFAULT_FRAME_RATE);
        assert_eq!(track.samples(), &[100, 100, 110, 110, 100, 100]);
        assert_eq!(decoder.decode_count(), 2);
    }

    #[test]
    fn test_bake_saturates() {
        let decoder = MockDecoder::new().with_sample(
            "loud.wav",
            PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![30_000, -30_000]),
        );
        let mut bank = SampleBank::new();
        let loud = bank.define(DefId::parse("01").unwrap(), PathBuf::from("loud.wav"));

        let sounds = [
            ScheduledSound::new(loud, at_frame(0)),
            ScheduledSound::new(loud, at_frame(0)),
        ];
        let track = bake(&sounds, &bank, &decoder).unwrap();
        assert_eq!(track.samples(), &[i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_bake_upmixes_when_any_sample_is_stereo() {
        let decoder = MockDecoder::new()
            .with_sample("mono.wav", PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![5]))
            .with_sample("stereo.wav", PcmBuffer::new(2, DEFAULT_FRAME_RATE, vec![1, 2]));
        let mut bank = SampleBank::new();
        let mono = bank.define(DefId::parse("01").unwrap(), PathBuf::from("mono.wav"));
        let stereo = bank.define(DefId::parse("02").unwrap(), PathBuf::from("stereo.wav"));

        let sounds = [
            ScheduledSound::new(mono, at_frame(0)),
            ScheduledSound::new(stereo, at_frame(1)),
        ];
        let track = bake(&sounds, &bank, &decoder).unwrap();
        assert_eq!(track.channels(), 2);
        assert_eq!(track.samples(), &[5, 5, 1, 2]);
    }

    #[test]
    fn test_bake_rejects_surround_samples() {
        let decoder = MockDecoder::new().with_sample(
            "surround.wav",
            PcmBuffer::new(6, DEFAULT_FRAME_RATE, vec![0; 6]),
        );
        let mut bank = SampleBank::new();
        let id = bank.define(DefId::parse("01").unwrap(), PathBuf::from("surround.wav"));

        let err = bake(&[ScheduledSound::new(id, Time::zero())], &bank, &decoder).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSampleFormat { sample, .. } if sample == "01"));
    }

    #[test]
    fn test_bake_skips_empty_samples() {
        let decoder = MockDecoder::new()
            .with_sample("empty.wav", PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![]))
            .with_sample("tick.wav", PcmBuffer::new(1, DEFAULT_FRAME_RATE, vec![7]));
        let mut bank = SampleBank::new();
        let empty = bank.define(DefId::parse("01").unwrap(), PathBuf::from("empty.wav"));
        let tick = bank.define(DefId::parse("02").unwrap(), PathBuf::from("tick.wav"));

        let sounds = [
            ScheduledSound::new(empty, at_frame(10)),
            ScheduledSound::new(tick, at_frame(1)),
        ];
        let track = bake(&sounds, &bank, &decoder).unwrap();
        assert_eq!(track.samples(), &[0, 7]);
    }
}
