//! Copying files into the destination tree.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::PlacementError;
use crate::models::config::PlacementConfig;

/// Copies source files into destination directories, creating them as
/// needed. An existing file with the same name is replaced.
///
/// The copy is written to a temporary file next to the target and renamed
/// into place, so the target is either the old file or the complete new one.
#[derive(Debug, Clone)]
pub struct FilePlacer {
    preserve_timestamps: bool,
}

impl FilePlacer {
    pub fn new() -> Self {
        Self::from_config(&PlacementConfig::default())
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self {
            preserve_timestamps: config.preserve_timestamps,
        }
    }

    /// Set whether the source modification time is kept.
    pub fn with_preserve_timestamps(mut self, preserve: bool) -> Self {
        self.preserve_timestamps = preserve;
        self
    }

    /// Copy `source` into `dir` as `file_name`, returning the new path.
    pub fn place(
        &self,
        source: &Path,
        dir: &Path,
        file_name: &OsStr,
    ) -> Result<PathBuf, PlacementError> {
        fs::create_dir_all(dir).map_err(|source| PlacementError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let target = dir.join(file_name);

        // Copying a file onto itself would truncate it.
        if is_same_file(source, &target) {
            debug!("{} is already in place", target.display());
            return Ok(target);
        }

        let copy_failed = |e| PlacementError::Copy {
            to: target.clone(),
            source: e,
        };

        let staged = self.stage_copy(source, dir).map_err(copy_failed)?;

        // Rename replaces the target even when it is read-only.
        staged.persist(&target).map_err(|e| copy_failed(e.error))?;

        Ok(target)
    }

    /// Copy `source` to a temporary file in `dir`. The file is removed if
    /// it is dropped before being persisted.
    fn stage_copy(&self, source: &Path, dir: &Path) -> std::io::Result<NamedTempFile> {
        let staged = tempfile::Builder::new().prefix(".cfdi-").tempfile_in(dir)?;
        fs::copy(source, staged.path())?;

        if self.preserve_timestamps {
            if let Err(e) = copy_modified_time(source, staged.path()) {
                warn!("Could not keep timestamp for {}: {}", source.display(), e);
            }
        }

        Ok(staged)
    }
}

impl Default for FilePlacer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The copy may already carry a read-only mode, so the time is set through a
/// read-only handle.
fn copy_modified_time(source: &Path, target: &Path) -> std::io::Result<()> {
    let modified = fs::metadata(source)?.modified()?;
    fs::File::open(target)?.set_modified(modified)
}
