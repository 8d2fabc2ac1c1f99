use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::audio::{resolve_sample_file, SampleBank};
use crate::chart::{ChartMetadata, DefId, Difficulty, LongNoteStyle, RawDatum};
use crate::error::{Error, Result};
use crate::parse::StaticEntry;
use crate::timing::OpenTimingBuilder;
use crate::units::{Bpm, ChartPosition, PauseDuration};

/// Tempo in effect when a chart has no `#BPM` header.
pub const DEFAULT_BPM: u32 = 130;

/// Directives that select between chart variants at load time.
const CONTROL_FLOW: [&str; 14] = [
    "RANDOM",
    "RONDAM",
    "SETRANDOM",
    "IF",
    "ELSEIF",
    "ELSE",
    "ENDIF",
    "ENDRANDOM",
    "SWITCH",
    "SETSWITCH",
    "CASE",
    "SKIP",
    "DEF",
    "ENDSW",
];

/// Everything the static directives define.
#[derive(Debug)]
pub(super) struct StaticState {
    pub metadata: ChartMetadata,
    pub timing: OpenTimingBuilder,
    pub tempos: HashMap<DefId, Bpm>,
    /// `#STOPxx` lengths in 1/192 measure units
    pub stops: HashMap<DefId, u32>,
    pub samples: SampleBank,
    pub ln_style: LongNoteStyle,
    pub ln_markers: HashSet<DefId>,
    pub referenced_files: Vec<PathBuf>,
    /// `#STP` pauses; their positions still need offset resolution
    pub scheduled_pauses: Vec<(RawDatum, PauseDuration)>,
}

impl StaticState {
    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: ChartMetadata::default(),
            timing: OpenTimingBuilder::new(Bpm::from_integer(DEFAULT_BPM)?),
            tempos: HashMap::new(),
            stops: HashMap::new(),
            samples: SampleBank::new(),
            ln_style: LongNoteStyle::default(),
            ln_markers: HashSet::new(),
            referenced_files: Vec::new(),
            scheduled_pauses: Vec::new(),
        })
    }

    pub fn apply(&mut self, entry: StaticEntry, chart_dir: &Path, load_sounds: bool) -> Result<()> {
        match entry {
            StaticEntry::Header { name, value } => {
                self.apply_header(&name, value, chart_dir, load_sounds)
            }
            StaticEntry::ScheduledPause {
                measure,
                thousandths,
                millis,
            } => {
                let datum = RawDatum::new(DefId::REST, measure, thousandths, 1000)?;
                self.scheduled_pauses
                    .push((datum, PauseDuration::parse(&millis)?));
                Ok(())
            }
        }
    }

    fn apply_header(
        &mut self,
        name: &str,
        value: String,
        chart_dir: &Path,
        load_sounds: bool,
    ) -> Result<()> {
        if CONTROL_FLOW.contains(&name) {
            return Err(Error::UnsupportedControlFlow(name.to_string()));
        }

        match name {
            "PLAYER" => {
                let player: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::validation("player", &value))?;
                if player != 1 {
                    return Err(Error::NotPlayer1(value));
                }
            }
            "TITLE" => self.metadata.title = value,
            "SUBTITLE" => {
                if let Some(difficulty) = Difficulty::from_subtitle(&value) {
                    debug!("Subtitle {:?} implies difficulty {}", value, difficulty);
                    self.metadata.difficulty = difficulty;
                }
                self.metadata.subtitle = value;
            }
            "ARTIST" => self.metadata.artist = value,
            "GENRE" => self.metadata.genre = value,
            "BPM" => {
                self.timing
                    .add_tempo_change(ChartPosition::zero(), Bpm::parse(&value)?);
            }
            "DIFFICULTY" => self.metadata.difficulty = Difficulty::parse(&value)?,
            "LNTYPE" => self.ln_style = LongNoteStyle::parse(&value)?,
            "LNOBJ" => {
                self.ln_markers.insert(DefId::parse(value.trim())?);
            }
            "STAGEFILE" => {
                self.reference_file(chart_dir, &value);
                self.metadata.background = value;
            }
            "BANNER" => {
                self.reference_file(chart_dir, &value);
                self.metadata.banner = value;
            }
            _ => self.apply_definition(name, value, chart_dir, load_sounds)?,
        }
        Ok(())
    }

    /// `#BPMxx`, `#EXBPMxx`, `#STOPxx` and `#WAVxx`.
    fn apply_definition(
        &mut self,
        name: &str,
        value: String,
        chart_dir: &Path,
        load_sounds: bool,
    ) -> Result<()> {
        if let Some(id) = definition_id(name, "EXBPM").or_else(|| definition_id(name, "BPM")) {
            self.tempos.insert(DefId::parse(id)?, Bpm::parse(&value)?);
        } else if let Some(id) = definition_id(name, "STOP") {
            let units = value
                .trim()
                .parse()
                .map_err(|_| Error::validation("stop length", &value))?;
            self.stops.insert(DefId::parse(id)?, units);
        } else if let Some(id) = definition_id(name, "WAV") {
            if load_sounds {
                let path = resolve_sample_file(chart_dir, &value)?;
                self.samples.define(DefId::parse(id)?, path);
            }
        }
        Ok(())
    }

    fn reference_file(&mut self, chart_dir: &Path, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.referenced_files
                .push(chart_dir.join(value.replace('\\', "/")));
        }
    }
}

/// The two-character id of a header named `<prefix>xx`.
fn definition_id<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|id| id.len() == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut StaticState, name: &str, value: &str) -> Result<()> {
        state.apply(
            StaticEntry::Header {
                name: name.to_string(),
                value: value.to_string(),
            },
            Path::new("."),
            false,
        )
    }

    #[test]
    fn test_metadata_headers() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "TITLE", "Song").unwrap();
        apply(&mut state, "ARTIST", "Someone").unwrap();
        apply(&mut state, "GENRE", "Trance").unwrap();
        apply(&mut state, "SUBTITLE", "[HYPER]").unwrap();

        assert_eq!(state.metadata.title, "Song");
        assert_eq!(state.metadata.artist, "Someone");
        assert_eq!(state.metadata.genre, "Trance");
        assert_eq!(state.metadata.subtitle, "[HYPER]");
        assert_eq!(state.metadata.difficulty, Difficulty::Hyper);
    }

    #[test]
    fn test_control_flow_is_rejected() {
        let mut state = StaticState::new().unwrap();
        for name in ["RANDOM", "IF", "ENDIF", "SWITCH", "SETRANDOM"] {
            assert!(matches!(
                apply(&mut state, name, "1"),
                Err(Error::UnsupportedControlFlow(n)) if n == name
            ));
        }
    }

    #[test]
    fn test_player_must_be_one() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "PLAYER", "1").unwrap();
        assert!(matches!(apply(&mut state, "PLAYER", "3"), Err(Error::NotPlayer1(_))));
        assert!(matches!(
            apply(&mut state, "PLAYER", "one"),
            Err(Error::Validation { unit: "player", .. })
        ));
    }

    #[test]
    fn test_initial_bpm_replaces_default() {
        let mut state = StaticState::new().unwrap();
        assert_eq!(
            state.timing.tempo_at(&ChartPosition::zero()),
            Some(&Bpm::from_integer(DEFAULT_BPM).unwrap())
        );
        apply(&mut state, "BPM", "155.5").unwrap();
        assert_eq!(
            state.timing.tempo_at(&ChartPosition::zero()),
            Some(&Bpm::parse("155.5").unwrap())
        );
    }

    #[test]
    fn test_definitions() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "BPM0A", "200").unwrap();
        apply(&mut state, "EXBPM0B", "87.5").unwrap();
        apply(&mut state, "STOP01", "96").unwrap();
        apply(&mut state, "LNOBJ", "zz").unwrap();

        assert_eq!(state.tempos.len(), 2);
        assert_eq!(
            state.tempos[&DefId::parse("0B").unwrap()],
            Bpm::parse("87.5").unwrap()
        );
        assert_eq!(state.stops[&DefId::parse("01").unwrap()], 96);
        assert!(state.ln_markers.contains(&DefId::parse("ZZ").unwrap()));
    }

    #[test]
    fn test_invalid_values() {
        let mut state = StaticState::new().unwrap();
        assert!(matches!(apply(&mut state, "DIFFICULTY", "9"), Err(Error::UnknownDifficulty(_))));
        assert!(matches!(apply(&mut state, "LNTYPE", "3"), Err(Error::LnTypeUnsupported(_))));
        assert!(matches!(apply(&mut state, "STOP01", "-5"), Err(Error::Validation { .. })));
        assert!(matches!(apply(&mut state, "BPM01", "0"), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "PLAYLEVEL", "12").unwrap();
        apply(&mut state, "WAVCMD", "00").unwrap();
        apply(&mut state, "TOTAL", "300").unwrap();
    }

    #[test]
    fn test_wav_definitions_skipped_without_sounds() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "WAV01", "missing.wav").unwrap();
        assert!(state.samples.is_empty());
    }

    #[test]
    fn test_images_are_referenced() {
        let mut state = StaticState::new().unwrap();
        apply(&mut state, "STAGEFILE", "bg.png").unwrap();
        apply(&mut state, "BANNER", "img\\banner.png").unwrap();
        assert_eq!(state.metadata.background, "bg.png");
        assert_eq!(
            state.referenced_files,
            vec![Path::new(".").join("bg.png"), Path::new(".").join("img/banner.png")]
        );
    }

    #[test]
    fn test_scheduled_pause() {
        let mut state = StaticState::new().unwrap();
        state
            .apply(
                StaticEntry::ScheduledPause {
                    measure: 2,
                    thousandths: 500,
                    millis: "750".to_string(),
                },
                Path::new("."),
                false,
            )
            .unwrap();
        let (datum, duration) = &state.scheduled_pauses[0];
        assert_eq!(datum.position(), &ChartPosition::from_parts(2, 1, 2).unwrap());
        assert_eq!(duration, &PauseDuration::from_millis(750));
    }
}
