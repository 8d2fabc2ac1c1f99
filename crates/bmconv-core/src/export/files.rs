use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

/// Copy `files` into `out_dir`, keeping their file names.
///
/// Nothing is copied when `out_dir` is the directory the files come from.
/// Existing destination files are left untouched. Returns the paths written.
pub fn copy_referenced_files<P: AsRef<Path>>(
    files: &[PathBuf],
    chart_dir: &Path,
    out_dir: P,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    if same_directory(chart_dir, out_dir) {
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for source in files {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = out_dir.join(name);
        if target.exists() {
            debug!("Skipping {}, already present", target.display());
            continue;
        }
        fs::copy(source, &target)?;
        written.push(target);
    }

    if !written.is_empty() {
        info!("Copied {} files to {}", written.len(), out_dir.display());
    }
    Ok(written)
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
