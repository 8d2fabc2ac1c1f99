use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::{bake, write_wav, SampleDecoder, WavDecoder};
use crate::chart::KeyLayout;
use crate::config::ConvertConfig;
use crate::convert::ChartConverter;
use crate::error::Result;
use crate::export::{copy_referenced_files, export_sm};
use crate::parse::decode_chart_text;

/// Files written by one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub chart: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub objects: usize,
    pub sounds: usize,
}

/// Converts chart files to the outputs selected by a `ConvertConfig`.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    config: ConvertConfig,
    layout: KeyLayout,
}

impl ConversionJob {
    /// Fails early when the configured key layout is invalid.
    pub fn new(config: ConvertConfig) -> Result<Self> {
        let layout = config.key_layout()?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Same settings, writing into `out_dir`.
    pub fn with_out_dir(&self, out_dir: PathBuf) -> Self {
        let mut job = self.clone();
        job.config.out_dir = Some(out_dir);
        job
    }

    pub fn run<P: AsRef<Path>>(&self, in_file: P) -> Result<ConversionReport> {
        self.run_with_decoder(in_file, &WavDecoder)
    }

    /// Convert `in_file`, decoding keysounds with `decoder`.
    ///
    /// Outputs are named after the chart file: `<stem>.sm` and `<stem>.wav`.
    pub fn run_with_decoder<P: AsRef<Path>>(
        &self,
        in_file: P,
        decoder: &dyn SampleDecoder,
    ) -> Result<ConversionReport> {
        let in_file = in_file.as_ref();
        let chart_dir = parent_dir(in_file);
        let out_dir = self
            .config
            .out_dir
            .clone()
            .unwrap_or_else(|| chart_dir.clone());
        let stem = in_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart".to_string());
        let music_file = format!("{}.wav", stem);

        info!("Converting {}", in_file.display());
        let bytes = fs::read(in_file)?;
        let text = decode_chart_text(&bytes);
        let chart = ChartConverter::new(&chart_dir)
            .load_sounds(self.config.mode.bakes_audio())
            .convert(&text)?;

        fs::create_dir_all(&out_dir)?;
        let mut report = ConversionReport {
            objects: chart.objects.len(),
            sounds: chart.sounds.len(),
            ..Default::default()
        };

        if self.config.mode.writes_chart() {
            let path = out_dir.join(format!("{}.sm", stem));
            export_sm(&path, &chart, &self.layout, &music_file)?;
            report.chart = Some(path);
        }

        if self.config.mode.bakes_audio() {
            let track = bake(&chart.sounds, &chart.samples, decoder)?;
            let path = out_dir.join(&music_file);
            write_wav(&path, &track)?;
            report.audio = Some(path);
        }

        if self.config.copy_files {
            report.copied = copy_referenced_files(&chart.referenced_files, &chart_dir, &out_dir)?;
        } else if !chart.referenced_files.is_empty() {
            warn!(
                "Not copying {} referenced files",
                chart.referenced_files.len()
            );
        }

        Ok(report)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
