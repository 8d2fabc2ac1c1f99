pub mod audio;
pub mod batch;
pub mod chart;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod job;
pub mod parse;
pub mod timing;
pub mod units;

pub use audio::{bake, PcmBuffer, SampleBank, SampleDecoder, ScheduledSound, WavDecoder};
pub use batch::{find_library_charts, BatchOutcome, LibraryChart};
pub use chart::{Difficulty, GameMode, Key, KeyLayout, NotefieldObject, Symbol};
pub use config::{ConversionMode, ConvertConfig};
pub use convert::{ChartConverter, ConvertedChart};
pub use error::{Error, Result};
pub use export::{compose_sm, export_sm};
pub use job::{ConversionJob, ConversionReport};
pub use timing::{OpenTimingBuilder, SealedTimingTable};
pub use units::{Beat, Bpm, ChartPosition, MeasureRatio, PauseDuration, Time, DEFAULT_FRAME_RATE};
