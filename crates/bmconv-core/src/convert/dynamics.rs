use tracing::{debug, info};

use super::statics::StaticState;
use super::ConvertedChart;
use crate::audio::ScheduledSound;
use crate::chart::{resolve_offsets, Channel, ContentKind, NotefieldBuilder, TempoSource};
use crate::error::{Error, Result};
use crate::parse::DynamicEvent;
use crate::units::{Bpm, MeasureRatio};

/// Apply channel events on top of the static definitions.
///
/// Order matters: measure lengths first, then position rewriting, then tempo
/// and pauses, and only once timing is sealed the notes and keysounds.
pub(super) fn resolve_dynamics(
    state: StaticState,
    mut events: Vec<DynamicEvent>,
    time_signatures: Vec<(u32, MeasureRatio)>,
) -> Result<ConvertedChart> {
    let StaticState {
        metadata,
        mut timing,
        tempos,
        stops,
        samples,
        ln_style,
        ln_markers,
        referenced_files,
        mut scheduled_pauses,
    } = state;

    for (measure, ratio) in time_signatures {
        timing.add_time_signature_change(measure, ratio);
    }

    events.sort_by_key(|e| e.datum.measure());
    resolve_offsets(
        events
            .iter_mut()
            .map(|e| &mut e.datum)
            .chain(scheduled_pauses.iter_mut().map(|(datum, _)| datum)),
        timing.time_signatures(),
    )?;

    for (datum, duration) in scheduled_pauses {
        timing.add_pause(datum.position().clone(), duration);
    }

    for event in &events {
        let Channel::TempoSlope(source) = event.channel else {
            continue;
        };
        let value = event.datum.value();
        let bpm = match source {
            TempoSource::Direct => {
                let raw = value
                    .to_hex_value()
                    .ok_or_else(|| Error::validation("BPM", value))?;
                Bpm::from_integer(raw)?
            }
            TempoSource::Extended => {
                tempos
                    .get(&value)
                    .cloned()
                    .ok_or_else(|| Error::UndefinedReference {
                        kind: "BPM",
                        id: value.to_string(),
                    })?
            }
        };
        timing.add_tempo_change(event.datum.position().clone(), bpm);
    }

    for event in events.iter().filter(|e| e.channel == Channel::Discontinuity) {
        let value = event.datum.value();
        let units = stops
            .get(&value)
            .copied()
            .ok_or_else(|| Error::UndefinedReference {
                kind: "STOP",
                id: value.to_string(),
            })?;
        timing.add_beat_pause(event.datum.position().clone(), units)?;
    }

    let timing = timing.seal();

    let mut content: Vec<&DynamicEvent> = events
        .iter()
        .filter(|e| matches!(e.channel, Channel::Background | Channel::Content { .. }))
        .collect();
    content.sort_by(|a, b| a.datum.position().cmp(b.datum.position()));
    debug!("Dispatching {} note and keysound events", content.len());

    let mut notefield = NotefieldBuilder::new(ln_style, ln_markers);
    let mut sounds = Vec::new();
    for event in content {
        let audible = match event.channel {
            Channel::Background => true,
            Channel::Content { key, kind } => match kind {
                ContentKind::Tap => notefield.add_tap(key, &event.datum)?,
                ContentKind::Invisible => true,
                ContentKind::LongNote => notefield.add_long_note(key, &event.datum),
                ContentKind::Mine => {
                    notefield.add_mine(key, &event.datum);
                    false
                }
            },
            Channel::Length | Channel::TempoSlope(_) | Channel::Discontinuity => false,
        };
        if !audible {
            continue;
        }
        if let Some(sample) = samples.lookup(event.datum.value()) {
            let start = timing.position_to_time(event.datum.position());
            sounds.push(ScheduledSound::new(sample, start));
        }
    }

    let objects = notefield.finish();
    info!(
        "Resolved {} notefield objects and {} keysounds",
        objects.len(),
        sounds.len()
    );

    Ok(ConvertedChart {
        metadata,
        timing,
        objects,
        sounds,
        samples,
        referenced_files,
    })
}
