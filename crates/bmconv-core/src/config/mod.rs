//! Conversion settings.
//!
//! - `ConvertConfig` - key layout, outputs and directories, loadable from TOML
//! - `ConversionMode` - which outputs a run produces

mod settings;

pub use settings::*;
