use std::collections::{HashMap, HashSet};

use strum::FromRepr;
use tracing::debug;

use super::{DefId, Key, RawDatum};
use crate::error::{Error, Result};
use crate::units::ChartPosition;

/// What a notefield object shows on its lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Tap,
    LongNoteStart,
    LongNoteEnd,
    Mine,
}

impl Symbol {
    /// Note character used in StepMania note rows.
    pub fn as_char(&self) -> char {
        match self {
            Self::Tap => '1',
            Self::LongNoteStart => '2',
            Self::LongNoteEnd => '3',
            Self::Mine => 'M',
        }
    }
}

/// A resolved playable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotefieldObject {
    pub position: ChartPosition,
    pub key: Key,
    pub symbol: Symbol,
}

/// How long notes are encoded on channels 5x (`#LNTYPE`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum LongNoteStyle {
    /// Every event alternates between start and end.
    #[default]
    Paired = 1,
    /// Any value starts a note; only `00` releases it.
    ReleaseMarker = 2,
}

impl LongNoteStyle {
    pub fn parse(text: &str) -> Result<Self> {
        text.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| Error::LnTypeUnsupported(text.trim().to_string()))
    }
}

/// Turns note channel events into notefield objects.
///
/// Events must be fed in ascending position order. Each lane tracks whether
/// a long note is currently held, and the taps that an `#LNOBJ` marker may
/// still turn into a long note start.
#[derive(Debug, Default)]
pub struct NotefieldBuilder {
    style: LongNoteStyle,
    markers: HashSet<DefId>,
    objects: Vec<NotefieldObject>,
    held: HashSet<Key>,
    open_taps: HashMap<Key, Vec<usize>>,
}

impl NotefieldBuilder {
    pub fn new(style: LongNoteStyle, markers: HashSet<DefId>) -> Self {
        Self {
            style,
            markers,
            ..Default::default()
        }
    }

    /// Handle an event on a tap channel. Returns whether its keysound plays.
    pub fn add_tap(&mut self, key: Key, datum: &RawDatum) -> Result<bool> {
        if !self.markers.contains(&datum.value()) {
            self.open_taps
                .entry(key)
                .or_default()
                .push(self.objects.len());
            self.push(datum.position(), key, Symbol::Tap);
            return Ok(true);
        }

        let start = self
            .open_taps
            .get_mut(&key)
            .and_then(Vec::pop)
            .ok_or_else(|| Error::FirstHoldHasNoStart {
                key: key.to_string(),
                position: datum.position().to_string(),
            })?;
        self.objects[start].symbol = Symbol::LongNoteStart;
        self.push(datum.position(), key, Symbol::LongNoteEnd);
        Ok(false)
    }

    /// Handle an event on a long note channel. Returns whether its keysound
    /// plays.
    pub fn add_long_note(&mut self, key: Key, datum: &RawDatum) -> bool {
        let release = datum.value().is_rest();
        if !self.held.contains(&key) {
            if release {
                return false;
            }
            self.held.insert(key);
            self.push(datum.position(), key, Symbol::LongNoteStart);
            return true;
        }

        match self.style {
            LongNoteStyle::Paired if release => {}
            LongNoteStyle::ReleaseMarker if !release => {}
            LongNoteStyle::Paired | LongNoteStyle::ReleaseMarker => {
                self.held.remove(&key);
                self.push(datum.position(), key, Symbol::LongNoteEnd);
            }
        }
        false
    }

    pub fn add_mine(&mut self, key: Key, datum: &RawDatum) {
        self.push(datum.position(), key, Symbol::Mine);
    }

    pub fn objects(&self) -> &[NotefieldObject] {
        &self.objects
    }

    pub fn finish(self) -> Vec<NotefieldObject> {
        if !self.held.is_empty() {
            debug!("{} long notes were never released", self.held.len());
        }
        self.objects
    }

    fn push(&mut self, position: &ChartPosition, key: Key, symbol: Symbol) {
        self.objects.push(NotefieldObject {
            position: position.clone(),
            key,
            symbol,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(value: &str, measure: u32, index: u32, split: u32) -> RawDatum {
        RawDatum::new(DefId::parse(value).unwrap(), measure, index, split).unwrap()
    }

    fn symbols(builder: &NotefieldBuilder) -> Vec<(Key, Symbol)> {
        builder.objects().iter().map(|o| (o.key, o.symbol)).collect()
    }

    #[test]
    fn test_long_note_style_parse() {
        assert_eq!(LongNoteStyle::parse("1").unwrap(), LongNoteStyle::Paired);
        assert_eq!(LongNoteStyle::parse("2").unwrap(), LongNoteStyle::ReleaseMarker);
        assert!(matches!(
            LongNoteStyle::parse("3"),
            Err(Error::LnTypeUnsupported(v)) if v == "3"
        ));
    }

    #[test]
    fn test_taps_and_mines() {
        let mut builder = NotefieldBuilder::default();
        assert!(builder.add_tap(Key::Key1, &datum("01", 0, 0, 4)).unwrap());
        builder.add_mine(Key::Key2, &datum("01", 0, 1, 4));
        assert_eq!(
            symbols(&builder),
            vec![(Key::Key1, Symbol::Tap), (Key::Key2, Symbol::Mine)]
        );
    }

    #[test]
    fn test_paired_style_toggles() {
        let mut builder = NotefieldBuilder::new(LongNoteStyle::Paired, HashSet::new());
        assert!(builder.add_long_note(Key::Key3, &datum("0A", 0, 0, 2)));
        // rests never count in paired style
        assert!(!builder.add_long_note(Key::Key3, &datum("00", 0, 1, 4)));
        assert!(!builder.add_long_note(Key::Key3, &datum("0B", 0, 1, 2)));
        assert!(builder.add_long_note(Key::Key3, &datum("0C", 1, 0, 1)));
        assert_eq!(
            symbols(&builder),
            vec![
                (Key::Key3, Symbol::LongNoteStart),
                (Key::Key3, Symbol::LongNoteEnd),
                (Key::Key3, Symbol::LongNoteStart),
            ]
        );
    }

    #[test]
    fn test_release_marker_style() {
        let mut builder = NotefieldBuilder::new(LongNoteStyle::ReleaseMarker, HashSet::new());
        // release before any start is ignored
        assert!(!builder.add_long_note(Key::Key1, &datum("00", 0, 0, 4)));
        assert!(builder.add_long_note(Key::Key1, &datum("0A", 0, 1, 4)));
        // other values are ignored while held
        assert!(!builder.add_long_note(Key::Key1, &datum("0A", 0, 2, 4)));
        assert!(!builder.add_long_note(Key::Key1, &datum("00", 0, 3, 4)));

        let objects = builder.finish();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].symbol, Symbol::LongNoteStart);
        assert_eq!(objects[1].symbol, Symbol::LongNoteEnd);
        assert_eq!(objects[1].position, ChartPosition::from_parts(0, 3, 4).unwrap());
    }

    #[test]
    fn test_lanes_are_independent() {
        let mut builder = NotefieldBuilder::default();
        builder.add_long_note(Key::Key1, &datum("0A", 0, 0, 1));
        builder.add_long_note(Key::Key2, &datum("0A", 0, 0, 1));
        builder.add_long_note(Key::Key1, &datum("0A", 1, 0, 1));
        assert_eq!(
            symbols(&builder),
            vec![
                (Key::Key1, Symbol::LongNoteStart),
                (Key::Key2, Symbol::LongNoteStart),
                (Key::Key1, Symbol::LongNoteEnd),
            ]
        );
    }

    #[test]
    fn test_ln_marker_converts_latest_tap_in_lane() {
        let marker = DefId::parse("ZZ").unwrap();
        let mut builder = NotefieldBuilder::new(LongNoteStyle::Paired, HashSet::from([marker]));
        builder.add_tap(Key::Key1, &datum("01", 0, 0, 4)).unwrap();
        builder.add_tap(Key::Key1, &datum("02", 0, 1, 4)).unwrap();
        builder.add_tap(Key::Key2, &datum("03", 0, 2, 4)).unwrap();
        let sounds = builder.add_tap(Key::Key1, &datum("ZZ", 0, 3, 4)).unwrap();

        assert!(!sounds);
        assert_eq!(
            symbols(&builder),
            vec![
                (Key::Key1, Symbol::Tap),
                (Key::Key1, Symbol::LongNoteStart),
                (Key::Key2, Symbol::Tap),
                (Key::Key1, Symbol::LongNoteEnd),
            ]
        );
    }

    #[test]
    fn test_ln_marker_without_tap_fails() {
        let marker = DefId::parse("ZZ").unwrap();
        let mut builder = NotefieldBuilder::new(LongNoteStyle::Paired, HashSet::from([marker]));
        builder.add_tap(Key::Key2, &datum("01", 0, 0, 1)).unwrap();
        let err = builder.add_tap(Key::Key1, &datum("ZZ", 1, 0, 1)).unwrap_err();
        assert!(matches!(err, Error::FirstHoldHasNoStart { .. }));
    }

    #[test]
    fn test_ln_marker_does_not_reuse_converted_tap() {
        let marker = DefId::parse("ZZ").unwrap();
        let mut builder = NotefieldBuilder::new(LongNoteStyle::Paired, HashSet::from([marker]));
        builder.add_tap(Key::Key1, &datum("01", 0, 0, 1)).unwrap();
        builder.add_tap(Key::Key1, &datum("ZZ", 1, 0, 1)).unwrap();
        assert!(builder.add_tap(Key::Key1, &datum("ZZ", 2, 0, 1)).is_err());
    }

    #[test]
    fn test_symbol_chars() {
        let row: String = [
            Symbol::Tap,
            Symbol::LongNoteStart,
            Symbol::LongNoteEnd,
            Symbol::Mine,
        ]
        .iter()
        .map(Symbol::as_char)
        .collect();
        assert_eq!(row, "123M");
    }
}
