//! Chart text ingestion.
//!
//! Splits chart text into the two streams consumed by the converter:
//! static `(header, value)` directives in file order, and dynamic channel
//! datums. Time signature lines are collected separately.

mod line;
mod text;

pub use line::*;
pub use text::*;

use tracing::debug;

use crate::chart::{Channel, RawDatum};
use crate::error::Result;
use crate::units::MeasureRatio;

/// A static directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticEntry {
    Header {
        name: String,
        value: String,
    },
    ScheduledPause {
        measure: u32,
        thousandths: u32,
        millis: String,
    },
}

/// One datum of a recognized channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicEvent {
    pub channel: Channel,
    pub datum: RawDatum,
}

/// Everything read from one chart file.
#[derive(Debug, Clone, Default)]
pub struct ChartStreams {
    pub statics: Vec<StaticEntry>,
    pub dynamics: Vec<DynamicEvent>,
    pub time_signatures: Vec<(u32, MeasureRatio)>,
}

impl ChartStreams {
    pub fn parse(text: &str) -> Result<Self> {
        let mut streams = Self::default();

        for line in text.lines() {
            match parse_line(line) {
                Some(ChartLine::Header { name, value }) => {
                    streams.statics.push(StaticEntry::Header { name, value });
                }
                Some(ChartLine::ScheduledPause {
                    measure,
                    thousandths,
                    millis,
                }) => {
                    streams.statics.push(StaticEntry::ScheduledPause {
                        measure,
                        thousandths,
                        millis,
                    });
                }
                Some(ChartLine::TimeSignature { measure, ratio }) => {
                    streams
                        .time_signatures
                        .push((measure, MeasureRatio::parse(&ratio)?));
                }
                Some(ChartLine::Channel {
                    measure,
                    channel,
                    message,
                }) => {
                    let datums = RawDatum::from_message(&message, measure, channel.keeps_rests())?;
                    streams
                        .dynamics
                        .extend(datums.into_iter().map(|datum| DynamicEvent { channel, datum }));
                }
                None => {}
            }
        }

        debug!(
            "Read {} static entries, {} channel datums, {} time signatures",
            streams.statics.len(),
            streams.dynamics.len(),
            streams.time_signatures.len()
        );
        Ok(streams)
    }
}
