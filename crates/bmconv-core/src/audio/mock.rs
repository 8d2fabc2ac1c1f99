//! Mock sample decoder for testing
//!
//! Serves in-memory buffers by path instead of reading files.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{PcmBuffer, SampleDecoder};
use crate::error::{Error, Result};

/// Mock decoder for testing
///
/// Counts decode calls so tests can check that samples are decoded once.
#[derive(Debug, Default)]
pub struct MockDecoder {
    buffers: HashMap<PathBuf, PcmBuffer>,
    decodes: Cell<usize>,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `buffer` for `path`
    pub fn with_sample(mut self, path: impl Into<PathBuf>, buffer: PcmBuffer) -> Self {
        self.buffers.insert(path.into(), buffer);
        self
    }

    /// Number of successful and failed decode calls so far
    pub fn decode_count(&self) -> usize {
        self.decodes.get()
    }
}

impl SampleDecoder for MockDecoder {
    fn decode(&self, path: &Path) -> Result<PcmBuffer> {
        self.decodes.set(self.decodes.get() + 1);
        self.buffers.get(path).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no mock sample for {}", path.display()),
            ))
        })
    }
}
