use strum::{Display, IntoStaticStr};

use crate::error::{Error, Result};

/// Playable lane of a single-player chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Key {
    #[strum(serialize = "1")]
    Key1,
    #[strum(serialize = "2")]
    Key2,
    #[strum(serialize = "3")]
    Key3,
    #[strum(serialize = "4")]
    Key4,
    #[strum(serialize = "5")]
    Key5,
    #[strum(serialize = "6")]
    Key6,
    #[strum(serialize = "7")]
    Key7,
    #[strum(serialize = "S")]
    Scratch,
}

impl Key {
    /// Lane named by the second character of a note channel code.
    ///
    /// Channel digits 6 and 7 are scratch and free zone; keys 6 and 7 live on
    /// digits 8 and 9.
    pub fn from_channel_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Key1),
            '2' => Some(Self::Key2),
            '3' => Some(Self::Key3),
            '4' => Some(Self::Key4),
            '5' => Some(Self::Key5),
            '6' => Some(Self::Scratch),
            '8' => Some(Self::Key6),
            '9' => Some(Self::Key7),
            _ => None,
        }
    }

    /// Lane named by one character of a key layout string.
    fn from_layout_char(c: char) -> Option<Option<Self>> {
        match c.to_ascii_uppercase() {
            '1' => Some(Some(Self::Key1)),
            '2' => Some(Some(Self::Key2)),
            '3' => Some(Some(Self::Key3)),
            '4' => Some(Some(Self::Key4)),
            '5' => Some(Some(Self::Key5)),
            '6' => Some(Some(Self::Key6)),
            '7' => Some(Some(Self::Key7)),
            'S' => Some(Some(Self::Scratch)),
            'X' => Some(None),
            _ => None,
        }
    }
}

/// StepMania game type, selected by the number of output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
pub enum GameMode {
    #[strum(serialize = "dance-single")]
    DanceSingle,
    #[strum(serialize = "pump-single")]
    PumpSingle,
    #[strum(serialize = "dance-solo")]
    DanceSolo,
    #[strum(serialize = "kb7-single")]
    Kb7Single,
    #[strum(serialize = "dance-double")]
    DanceDouble,
    #[strum(serialize = "pump-double")]
    PumpDouble,
}

impl GameMode {
    pub fn from_columns(columns: usize) -> Result<Self> {
        match columns {
            4 => Ok(Self::DanceSingle),
            5 => Ok(Self::PumpSingle),
            6 => Ok(Self::DanceSolo),
            7 => Ok(Self::Kb7Single),
            8 => Ok(Self::DanceDouble),
            10 => Ok(Self::PumpDouble),
            other => Err(Error::UnsupportedGameMode(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Mapping of output columns to chart lanes, e.g. `S1234567`.
///
/// `X` leaves a column empty. A lane listed twice only fills its first
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    columns: Vec<Option<Key>>,
    mode: GameMode,
}

impl KeyLayout {
    pub const DEFAULT: &'static str = "S1234567";

    pub fn parse(layout: &str) -> Result<Self> {
        let layout = layout.trim();
        let columns = layout
            .chars()
            .map(|c| Key::from_layout_char(c).ok_or_else(|| Error::validation("key layout", layout)))
            .collect::<Result<Vec<_>>>()?;
        let mode = GameMode::from_columns(columns.len())?;
        Ok(Self { columns, mode })
    }

    pub fn game_mode(&self) -> GameMode {
        self.mode
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Output column of `key`, if the layout shows it.
    pub fn column_of(&self, key: Key) -> Option<usize> {
        self.columns.iter().position(|c| *c == Some(key))
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            columns: vec![
                Some(Key::Scratch),
                Some(Key::Key1),
                Some(Key::Key2),
                Some(Key::Key3),
                Some(Key::Key4),
                Some(Key::Key5),
                Some(Key::Key6),
                Some(Key::Key7),
            ],
            mode: GameMode::DanceDouble,
        }
    }
}
