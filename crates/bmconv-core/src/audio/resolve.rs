use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Find the file a `#WAVxx` declaration refers to.
///
/// The declared extension is ignored: charts often name `.wav` files that
/// ship as `.ogg`. The declared name is resolved relative to `chart_dir` and
/// must match exactly one `<stem>.*` file.
pub fn resolve_sample_file(chart_dir: &Path, declared: &str) -> Result<PathBuf> {
    let undecidable = || Error::UndecidableAudioFile(declared.to_string());

    let normalized = declared.trim().replace('\\', "/");
    let relative = Path::new(&normalized);
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(undecidable)?;
    let dir = match relative.parent() {
        Some(parent) => chart_dir.join(parent),
        None => chart_dir.to_path_buf(),
    };

    let prefix = format!("{stem}.");
    let entries = fs::read_dir(&dir).map_err(|_| undecidable())?;
    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let matches = name
            .to_str()
            .is_some_and(|n| n.starts_with(&prefix) && n.len() > prefix.len());
        if matches && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }

    match candidates.len() {
        1 => {
            let path = candidates.remove(0);
            debug!("Resolved {} to {}", declared, path.display());
            Ok(path)
        }
        _ => Err(undecidable()),
    }
}
