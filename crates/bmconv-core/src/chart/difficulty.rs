use serde::{Deserialize, Serialize};
use strum::{EnumString, FromRepr, IntoStaticStr};

use crate::error::{Error, Result};

/// Difficulty slot of a chart, as numbered by the `#DIFFICULTY` header.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum Difficulty {
    #[strum(serialize = "Beginner")]
    Beginner = 1,
    #[strum(serialize = "Medium")]
    Normal = 2,
    #[strum(serialize = "Hard")]
    Hyper = 3,
    #[strum(serialize = "Challenge")]
    Another = 4,
    #[default]
    #[strum(serialize = "Edit")]
    Insane = 5,
}

/// Subtitle keywords hinting at a difficulty, lowest level first.
const SUBTITLE_KEYWORDS: [(Difficulty, &[&str]); 5] = [
    (
        Difficulty::Beginner,
        &["EASY", "BEGINNER", "LIGHT", "SIMPLE", "[B]", "(B)"],
    ),
    (Difficulty::Normal, &["NORMAL", "STANDARD", "[N]", "(N)"]),
    (Difficulty::Hyper, &["HYPER", "HARD", "EXTEND", "[H]", "(H)"]),
    (Difficulty::Another, &["MANIAC", "EXTRA", "EX"]),
    (
        Difficulty::Insane,
        &["INSANE", "ANOTHER", "PLUS", "[A]", "(A)"],
    ),
];

impl Difficulty {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Parse a `#DIFFICULTY` value (1-5).
    pub fn parse(text: &str) -> Result<Self> {
        text.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_u8)
            .ok_or_else(|| Error::UnknownDifficulty(text.trim().to_string()))
    }

    /// Guess the difficulty from keywords in a subtitle.
    ///
    /// When keywords of several levels appear, the highest level wins.
    pub fn from_subtitle(subtitle: &str) -> Option<Self> {
        let subtitle = subtitle.to_uppercase();
        SUBTITLE_KEYWORDS
            .iter()
            .rev()
            .find(|(_, keywords)| keywords.iter().any(|k| subtitle.contains(k)))
            .map(|(difficulty, _)| *difficulty)
    }

    /// Numeric level, also used as the StepMania meter.
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Difficulty name as written in a StepMania `#NOTES` block.
    pub fn sm_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sm_name())
    }
}
