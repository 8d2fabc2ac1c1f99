use std::path::PathBuf;

use bmconv_core::{ConversionMode, ConvertConfig};
use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "bmconv")]
#[command(about = "Convert BMS charts to StepMania charts with a baked keysound track", version)]
#[command(disable_version_flag = true)]
#[command(group(ArgGroup::new("input").required(true).args(["in_file", "in_dir"])))]
pub struct Args {
    /// Chart file to convert
    #[arg(short, long, value_name = "FILE", short_alias = 'I', alias = "in_file")]
    pub in_file: Option<PathBuf>,

    /// Library to convert: every chart directly inside each of its folders
    #[arg(long, value_name = "DIR", alias = "in_dir")]
    pub in_dir: Option<PathBuf>,

    /// Output directory (defaults to the chart's directory, or the library)
    #[arg(short, long, value_name = "DIR", short_alias = 'O', alias = "out_dir")]
    pub out_dir: Option<PathBuf>,

    /// Output column layout: 1-7 keys, S scratch, X empty column
    #[arg(short, long, short_alias = 'K')]
    pub keys: Option<String>,

    /// Outputs to produce
    #[arg(short, long, value_enum, ignore_case = true, short_alias = 'M')]
    pub mode: Option<ModeArg>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE", env = "BMCONV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not copy banner and background images
    #[arg(long)]
    pub no_copy: bool,

    /// Log progress
    #[arg(short, long, short_alias = 'V')]
    pub verbose: bool,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    version: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    All,
    Sm,
    Audio,
}

impl From<ModeArg> for ConversionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => ConversionMode::All,
            ModeArg::Sm => ConversionMode::Sm,
            ModeArg::Audio => ConversionMode::Audio,
        }
    }
}

impl Args {
    /// Settings from `--config` with command line flags applied on top.
    ///
    /// A config file that cannot be read or parsed is reported and replaced
    /// by the defaults.
    pub fn resolve_config(&self) -> ConvertConfig {
        let mut config = match &self.config {
            Some(path) => match ConvertConfig::load(path) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to load config: {}, using defaults", e);
                    ConvertConfig::default()
                }
            },
            None => ConvertConfig::default(),
        };

        if let Some(keys) = &self.keys {
            config.keys = keys.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = Some(out_dir.clone());
        }
        if self.no_copy {
            config.copy_files = false;
        }
        config
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "bmconv=info,bmconv_core=info"
        } else {
            "bmconv=warn,bmconv_core=warn"
        }
    }
}
