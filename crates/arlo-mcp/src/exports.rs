//! File exports for the save tools.
//!
//! The agent never chooses file names; every export gets a fresh
//! ULID-based name inside a single configured directory.

use std::path::{Path, PathBuf};

use arlo_core::{ArloError, ArloResult};

pub struct ExportDir {
    dir: PathBuf,
}

impl ExportDir {
    /// Open (and create, if missing) the export directory.
    pub fn new(dir: PathBuf) -> ArloResult<Self> {
        std::fs::create_dir_all(&dir)
            .map_err(|e| ArloError::Export(format!("cannot create export directory: {e}")))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `content` to a new file and return its full path.
    pub fn save(&self, content: &str, extension: &str) -> ArloResult<PathBuf> {
        let name = format!("{}.{}", ulid::Ulid::new(), extension.trim_start_matches('.'));
        let path = self.dir.join(name);
        std::fs::write(&path, content)
            .map_err(|e| ArloError::Export(format!("cannot write export file: {e}")))?;
        Ok(path)
    }
}

/// Fallback when no export directory is configured.
pub fn default_export_dir() -> PathBuf {
    std::env::temp_dir().join("arlo_files")
}
