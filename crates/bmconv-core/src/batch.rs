use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::{SampleDecoder, WavDecoder};
use crate::error::Result;
use crate::job::{ConversionJob, ConversionReport};

/// Chart file extensions picked up by a library scan.
pub const CHART_EXTENSIONS: [&str; 3] = ["bms", "bme", "bml"];

/// A chart found in a library: `<library>/<folder>/<file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryChart {
    pub folder: String,
    pub path: PathBuf,
}

impl LibraryChart {
    /// Output directory name, `<folder> <file name>`.
    pub fn output_name(&self) -> String {
        let file = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} {}", self.folder, file)
    }
}

/// Result of converting one chart of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub chart: LibraryChart,
    pub out_dir: PathBuf,
    pub result: Result<ConversionReport>,
}

/// Charts directly inside each subdirectory of `library`.
///
/// Files in `library` itself and deeper subdirectories are not scanned.
/// Folders and files are returned in name order.
pub fn find_library_charts<P: AsRef<Path>>(library: P) -> Result<Vec<LibraryChart>> {
    let mut folders: Vec<PathBuf> = fs::read_dir(library.as_ref())?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut charts = Vec::new();
    for folder in folders {
        let folder_name = folder
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut files: Vec<PathBuf> = fs::read_dir(&folder)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_chart_file(path))
            .collect();
        files.sort();
        charts.extend(files.into_iter().map(|path| LibraryChart {
            folder: folder_name.clone(),
            path,
        }));
    }
    Ok(charts)
}

fn is_chart_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CHART_EXTENSIONS.iter().any(|c| c.eq_ignore_ascii_case(ext)))
}

impl ConversionJob {
    pub fn run_batch<P: AsRef<Path>>(&self, library: P) -> Result<Vec<BatchOutcome>> {
        self.run_batch_with_decoder(library, &WavDecoder)
    }

    /// Convert every chart of `library`, each into its own directory under
    /// the configured output directory (the library itself if unset).
    ///
    /// A failing chart is logged and recorded; the batch goes on. Only a
    /// library that cannot be scanned fails the whole call.
    pub fn run_batch_with_decoder<P: AsRef<Path>>(
        &self,
        library: P,
        decoder: &dyn SampleDecoder,
    ) -> Result<Vec<BatchOutcome>> {
        let library = library.as_ref();
        let out_root = self
            .config()
            .out_dir
            .clone()
            .unwrap_or_else(|| library.to_path_buf());

        let charts = find_library_charts(library)?;
        info!("Found {} charts in {}", charts.len(), library.display());

        let mut outcomes = Vec::with_capacity(charts.len());
        for chart in charts {
            let out_dir = out_root.join(chart.output_name());
            let result = self
                .with_out_dir(out_dir.clone())
                .run_with_decoder(&chart.path, decoder);
            if let Err(e) = &result {
                warn!("Failed to convert {}: {}", chart.path.display(), e);
            }
            outcomes.push(BatchOutcome {
                chart,
                out_dir,
                result,
            });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            "Batch done: {} converted, {} failed",
            outcomes.len() - failed,
            failed
        );
        Ok(outcomes)
    }
}
