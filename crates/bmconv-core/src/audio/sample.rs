use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{PcmBuffer, SampleDecoder};
use crate::chart::DefId;
use crate::error::{Error, Result};

/// Index of a sample inside its `SampleBank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(pub(crate) usize);

impl SampleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A keysound file, decoded on first use.
#[derive(Debug)]
pub struct SoundSample {
    def_id: DefId,
    path: PathBuf,
    pcm: OnceCell<PcmBuffer>,
}

impl SoundSample {
    pub fn new(def_id: DefId, path: PathBuf) -> Self {
        Self {
            def_id,
            path,
            pcm: OnceCell::new(),
        }
    }

    pub fn def_id(&self) -> DefId {
        self.def_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.pcm.get().is_some()
    }

    /// Decoded audio. The file is decoded at most once; a failed decode is
    /// not cached.
    pub fn load(&self, decoder: &dyn SampleDecoder) -> Result<&PcmBuffer> {
        if let Some(pcm) = self.pcm.get() {
            return Ok(pcm);
        }
        let pcm = decoder.decode(&self.path)?;
        Ok(self.pcm.get_or_init(|| pcm))
    }
}

/// Keysound samples of one conversion, addressed by `SampleId`.
///
/// Redefining a `#WAVxx` id adds a new sample and points the id at it. All
/// definitions are applied before any channel event, so every event plays
/// the last definition of its id.
#[derive(Debug, Default)]
pub struct SampleBank {
    samples: Vec<SoundSample>,
    by_def: HashMap<DefId, SampleId>,
}

impl SampleBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, def_id: DefId, path: PathBuf) -> SampleId {
        let id = SampleId(self.samples.len());
        self.samples.push(SoundSample::new(def_id, path));
        self.by_def.insert(def_id, id);
        id
    }

    pub fn lookup(&self, def_id: DefId) -> Option<SampleId> {
        self.by_def.get(&def_id).copied()
    }

    pub fn get(&self, id: SampleId) -> Option<&SoundSample> {
        self.samples.get(id.0)
    }

    pub fn load(&self, id: SampleId, decoder: &dyn SampleDecoder) -> Result<&PcmBuffer> {
        self.get(id)
            .ok_or_else(|| Error::UndefinedReference {
                kind: "sample",
                id: id.0.to_string(),
            })?
            .load(decoder)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SampleId, &SoundSample)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (SampleId(i), sample))
    }
}
