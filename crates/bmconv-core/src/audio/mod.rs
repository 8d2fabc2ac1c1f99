//! Keysound audio.
//!
//! - `PcmBuffer` - interleaved 16-bit PCM
//! - `SampleDecoder` / `WavDecoder` - sample file decoding
//! - `SampleBank`, `SoundSample`, `SampleId` - lazily decoded samples of one chart
//! - `ScheduledSound` - a sample placed at a time
//! - `bake` - mixes scheduled sounds into one track
//! - `write_wav` - encodes the baked track

mod decoder;
mod format;
pub mod mock;
mod mixer;
mod pcm;
mod resolve;
mod sample;
mod schedule;
mod wav;

pub use decoder::*;
pub use format::*;
pub use mixer::*;
pub use mock::MockDecoder;
pub use pcm::*;
pub use resolve::*;
pub use sample::*;
pub use schedule::*;
pub use wav::*;
