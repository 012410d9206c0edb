//! Source directory scanning.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PreconditionError;

/// List the regular files directly inside `dir` whose name ends in
/// `.{extension}` (case-sensitive; a file named just `.xml` counts).
/// Subdirectories are not descended into.
///
/// The result is sorted by file name so runs are reproducible. An empty list
/// is a valid outcome.
pub fn scan_directory(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PreconditionError> {
    let entries = fs::read_dir(dir).map_err(|source| PreconditionError::Inaccessible {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if !has_extension(&entry.file_name(), extension) {
            continue;
        }

        let path = entry.path();
        // Follows symlinks, so a link to a regular file counts.
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} .{} files in {}", files.len(), extension, dir.display());

    Ok(files)
}

fn has_extension(file_name: &OsStr, extension: &str) -> bool {
    let suffix = format!(".{}", extension);
    file_name.as_encoded_bytes().ends_with(suffix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_scan_picks_only_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("a.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("upper.XML"), "<a/>").unwrap();

        let files = scan_directory(dir.path(), "xml").unwrap();
        assert_eq!(names(&files), vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn test_scan_includes_bare_dot_xml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".xml"), "<a/>").unwrap();
        fs::write(dir.path().join("xml"), "<a/>").unwrap();
        fs::write(dir.path().join("a.tar.xml"), "<a/>").unwrap();

        let files = scan_directory(dir.path(), "xml").unwrap();
        assert_eq!(names(&files), vec![".xml", "a.tar.xml"]);
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("inner.xml"), "<a/>").unwrap();
        fs::create_dir(dir.path().join("folder.xml")).unwrap();

        let files = scan_directory(dir.path(), "xml").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = scan_directory(&missing, "xml").unwrap_err();
        assert!(matches!(err, PreconditionError::Inaccessible { .. }));
    }
}
