use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::chart::KeyLayout;
use crate::error::{Error, Result};

/// Outputs produced by a conversion.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversionMode {
    /// Chart and audio track
    #[default]
    All,
    /// StepMania chart only
    Sm,
    /// Audio track only
    Audio,
}

impl ConversionMode {
    pub fn writes_chart(&self) -> bool {
        matches!(self, Self::All | Self::Sm)
    }

    pub fn bakes_audio(&self) -> bool {
        matches!(self, Self::All | Self::Audio)
    }
}

/// Settings of a conversion run.
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// keys = "S1234567"
/// mode = "all"
/// out_dir = "converted"
/// copy_files = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Output column layout, see `KeyLayout`
    pub keys: String,
    pub mode: ConversionMode,
    /// Defaults to the chart's directory
    pub out_dir: Option<PathBuf>,
    /// Copy banner and background images next to the output
    pub copy_files: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            keys: KeyLayout::DEFAULT.to_string(),
            mode: ConversionMode::default(),
            out_dir: None,
            copy_files: true,
        }
    }
}

impl ConvertConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParseError(e.to_string()))
    }

    pub fn key_layout(&self) -> Result<KeyLayout> {
        KeyLayout::parse(&self.keys)
    }
}
