//! Slot-addressed sample persistence
//!
//! One recorder owns one store directory. Each reservoir slot maps to a
//! single blob file named by its index; writing a slot fully replaces the
//! previous occupant. A `manifest.json` alongside the blobs records the
//! codec and capacity so samples can be decoded offline with no
//! out-of-band knowledge.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::capture::CapturedCall;
use crate::codec::{codec_by_name, SampleCodec};
use crate::error::{RecorderError, Result};

/// File name of the per-store manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Metadata describing one sample store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Recuerdo version that wrote this store
    pub recuerdo_version: String,
    /// Label of the recorded target (subdirectory name)
    pub target: String,
    /// Reservoir capacity (maximum number of slot blobs)
    pub sample_size: usize,
    /// Codec used for slot blobs
    pub codec: String,
    /// Creation time (unix seconds)
    pub created_at: String,
}

impl StoreManifest {
    fn new(target: &str, sample_size: usize, codec: &str) -> Self {
        Self {
            recuerdo_version: env!("CARGO_PKG_VERSION").to_string(),
            target: target.to_string(),
            sample_size,
            codec: codec.to_string(),
            created_at: unix_timestamp(),
        }
    }
}

/// Lightweight timestamp without a date-time dependency
fn unix_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}

/// Slot-addressed blob store for one recorder
pub struct SampleStore {
    dir: PathBuf,
    manifest: StoreManifest,
    codec: Box<dyn SampleCodec>,
}

impl SampleStore {
    /// Create a store directory and write its manifest
    ///
    /// # Arguments
    ///
    /// * `dir` - Recorder-owned subdirectory (created if absent)
    /// * `target` - Label of the recorded target
    /// * `sample_size` - Reservoir capacity
    /// * `codec` - Blob serialization strategy
    pub fn create(
        dir: impl Into<PathBuf>,
        target: &str,
        sample_size: usize,
        codec: Box<dyn SampleCodec>,
    ) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let manifest = StoreManifest::new(target, sample_size, codec.name());
        let encoded = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| RecorderError::EncodeError(e.to_string()))?;
        fs::write(dir.join(MANIFEST_FILE), encoded)?;

        debug!(dir = %dir.display(), codec = codec.name(), "sample store created");
        Ok(Self {
            dir,
            manifest,
            codec,
        })
    }

    /// Open an existing store for offline inspection
    ///
    /// Reads the manifest and resolves the codec it names.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let manifest_path = dir.join(MANIFEST_FILE);
        let bytes = fs::read(&manifest_path).map_err(|e| {
            RecorderError::ManifestError(format!("{}: {}", manifest_path.display(), e))
        })?;
        let manifest: StoreManifest = serde_json::from_slice(&bytes)
            .map_err(|e| RecorderError::ManifestError(e.to_string()))?;
        let codec = codec_by_name(&manifest.codec).ok_or_else(|| {
            RecorderError::ManifestError(format!("unknown codec `{}`", manifest.codec))
        })?;
        Ok(Self {
            dir,
            manifest,
            codec,
        })
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store manifest
    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    /// Persist a captured call into a slot, replacing any prior occupant
    pub fn persist(&self, slot: usize, call: &CapturedCall) -> Result<()> {
        let bytes = self.codec.encode(call)?;
        fs::write(self.slot_path(slot), bytes)?;
        Ok(())
    }

    /// Load the captured call occupying a slot
    pub fn load(&self, slot: usize) -> Result<CapturedCall> {
        let bytes = fs::read(self.slot_path(slot))?;
        self.codec.decode(&bytes)
    }

    /// Slot indices currently occupied on disk, ascending
    pub fn occupied_slots(&self) -> Result<Vec<usize>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(slot) = name.parse::<usize>() {
                    slots.push(slot);
                }
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }

    fn slot_path(&self, slot: usize) -> PathBuf {
        self.dir.join(slot.to_string())
    }
}

impl std::fmt::Debug for SampleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleStore")
            .field("dir", &self.dir)
            .field("codec", &self.manifest.codec)
            .finish()
    }
}
