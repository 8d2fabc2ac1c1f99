//! Chart conversion pipeline.
//!
//! `ChartConverter` runs the static directives and then the channel events of
//! one chart, producing a `ConvertedChart`: metadata, sealed timing,
//! notefield objects and scheduled keysounds.

mod dynamics;
mod statics;

pub use statics::DEFAULT_BPM;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::audio::{SampleBank, ScheduledSound};
use crate::chart::{ChartMetadata, NotefieldObject};
use crate::error::Result;
use crate::parse::ChartStreams;
use crate::timing::SealedTimingTable;

/// Result of converting one chart.
#[derive(Debug)]
pub struct ConvertedChart {
    pub metadata: ChartMetadata,
    pub timing: SealedTimingTable,
    /// Notefield objects in ascending position order
    pub objects: Vec<NotefieldObject>,
    pub sounds: Vec<ScheduledSound>,
    pub samples: SampleBank,
    /// Image files the chart refers to, relative to the working directory
    pub referenced_files: Vec<PathBuf>,
}

/// Converts chart text found in `chart_dir`.
#[derive(Debug, Clone)]
pub struct ChartConverter {
    chart_dir: PathBuf,
    load_sounds: bool,
}

impl ChartConverter {
    pub fn new(chart_dir: impl Into<PathBuf>) -> Self {
        Self {
            chart_dir: chart_dir.into(),
            load_sounds: true,
        }
    }

    /// Whether `#WAVxx` files are resolved and keysounds scheduled.
    pub fn load_sounds(mut self, load_sounds: bool) -> Self {
        self.load_sounds = load_sounds;
        self
    }

    pub fn chart_dir(&self) -> &Path {
        &self.chart_dir
    }

    pub fn convert(&self, text: &str) -> Result<ConvertedChart> {
        self.convert_streams(ChartStreams::parse(text)?)
    }

    pub fn convert_streams(&self, streams: ChartStreams) -> Result<ConvertedChart> {
        let ChartStreams {
            statics,
            dynamics,
            time_signatures,
        } = streams;

        let mut state = statics::StaticState::new()?;
        let count = statics.len();
        for entry in statics {
            state.apply(entry, &self.chart_dir, self.load_sounds)?;
        }
        info!(
            "Processed {} static directives, {} samples defined",
            count,
            state.samples.len()
        );

        dynamics::resolve_dynamics(state, dynamics, time_signatures)
    }
}
