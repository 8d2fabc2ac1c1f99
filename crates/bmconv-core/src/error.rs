use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {unit}: {value}")]
    Validation { unit: &'static str, value: String },

    #[error("Undefined {kind} reference: {id}")]
    UndefinedReference { kind: &'static str, id: String },

    #[error(
        "Chart defines a wav file that either does not exist or has multiple candidates: {0}"
    )]
    UndecidableAudioFile(String),

    #[error("Control flow directives are not supported: #{0}")]
    UnsupportedControlFlow(String),

    #[error("This chart is not for Player 1 (PLAYER {0})")]
    NotPlayer1(String),

    #[error("Unsupported LNTYPE: {0}")]
    LnTypeUnsupported(String),

    #[error("Long note end on lane {key} at measure {position} has no start")]
    FirstHoldHasNoStart { key: String, position: String },

    #[error("Unsupported key layout length of {0}, only 4, 5, 6, 7, 8 and 10 keys are supported")]
    UnsupportedGameMode(usize),

    #[error("Unknown difficulty value: {0}")]
    UnknownDifficulty(String),

    #[error("This chart is empty")]
    EmptyChart,

    #[error(
        "A beat pause would last less than 1 ms which cannot be represented: BPM {bpm}, length {units}/192"
    )]
    PauseTooShort { bpm: String, units: u32 },

    #[error("Unsupported sample format in {sample}: {message}")]
    UnsupportedSampleFormat { sample: String, message: String },

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    pub(crate) fn validation(unit: &'static str, value: impl ToString) -> Self {
        Error::Validation {
            unit,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
