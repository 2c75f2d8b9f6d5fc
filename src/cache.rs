//! Process-local caching of the vocabulary archive.
//!
//! The archive changes only when a new vocabulary release is published, so
//! the driver keys cached bytes by a version string and re-fetches only on a
//! key change. The store is an explicit handle injected into the driver; the
//! contract is "last write wins, version-key guarded": `put` removes entries
//! under any other version key.

use std::fs;
use std::path::{Path, PathBuf};

/// Storage interface for archive bytes.
pub trait ArchiveStore {
    /// Bytes cached under this version key, if any.
    fn get(&self, version: &str) -> Option<Vec<u8>>;

    /// Cache bytes under this version key, dropping other versions.
    fn put(&self, version: &str, bytes: &[u8]);

    /// Drop everything.
    fn clear(&self);
}

/// Disk-backed store under a dedicated directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default per-user location, e.g. `~/.cache/twl-generator`.
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|base| Self::new(base.join("twl-generator")))
    }

    fn entry_path(&self, version: &str) -> PathBuf {
        // Version keys come from release tags; keep the file name tame.
        let safe: String = version
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            })
            .collect();
        self.dir.join(format!("archive-{safe}.zip"))
    }

    fn remove_entries_except(&self, keep: Option<&Path>) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_archive = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("archive-") && n.ends_with(".zip"));
            if is_archive && keep != Some(path.as_path()) {
                if let Err(error) = fs::remove_file(&path) {
                    tracing::debug!(path = %path.display(), %error, "Failed to drop stale archive");
                }
            }
        }
    }
}

impl ArchiveStore for DiskStore {
    fn get(&self, version: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(version);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), "Using cached vocabulary archive");
                Some(bytes)
            }
            Err(_) => None,
        }
    }

    fn put(&self, version: &str, bytes: &[u8]) {
        if let Err(error) = fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), %error, "Cannot create cache directory");
            return;
        }
        let path = self.entry_path(version);
        self.remove_entries_except(Some(path.as_path()));
        if let Err(error) = fs::write(&path, bytes) {
            tracing::warn!(path = %path.display(), %error, "Failed to cache vocabulary archive");
        }
    }

    fn clear(&self) {
        self.remove_entries_except(None);
    }
}
