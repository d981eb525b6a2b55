//! The single directory-listing primitive every traversal goes through.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::filesystem::PathKind;
use crate::filesystem::error::{IoResultExt, PathError};

/// What a listing reports about an entry, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Supported(PathKind),
    Symlink,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// The kind of the entry's target, following a symlink with one extra
    /// stat. `None` for anything that is not a file or a directory.
    pub fn resolve_kind(&self) -> Result<Option<PathKind>, PathError> {
        match self.kind {
            EntryKind::Supported(kind) => Ok(Some(kind)),
            EntryKind::Unsupported => Ok(None),
            EntryKind::Symlink => {
                let metadata = fs::metadata(&self.path).at_path(&self.path)?;
                Ok(PathKind::from_metadata(&metadata))
            }
        }
    }
}

/// Lists `path` once, in host order. The self and parent pseudo-entries are
/// never reported. Opening the directory is the only failure that aborts;
/// a broken entry is reported in place so callers can carry on.
pub fn list_directory(path: &Path) -> Result<Vec<Result<DirectoryEntry, PathError>>, PathError> {
    trace!("Listing directory {}", path.display());
    let reader = fs::read_dir(path).at_path(path)?;

    let entries = reader
        .map(|entry| -> Result<DirectoryEntry, PathError> {
            let entry = entry.at_path(path)?;
            let entry_path = entry.path();
            let file_type = entry.file_type().at_path(&entry_path)?;

            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Supported(PathKind::Directory)
            } else if file_type.is_file() {
                EntryKind::Supported(PathKind::File)
            } else {
                EntryKind::Unsupported
            };

            Ok(DirectoryEntry {
                name: entry.file_name(),
                path: entry_path,
                kind,
            })
        })
        .collect::<Vec<_>>();

    trace!("Listed {} entries in {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_files_and_directories_without_pseudo_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("a.txt"), b"a").expect("Failed to write file");
        std::fs::create_dir(temp_dir.path().join("sub")).expect("Failed to create dir");

        let mut entries = list_directory(temp_dir.path())
            .expect("Failed to list directory")
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("Every entry should be readable");
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::Supported(PathKind::File));
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Supported(PathKind::Directory));
        assert_eq!(entries[1].path, temp_dir.path().join("sub"));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = list_directory(&temp_dir.path().join("nope"));
        assert!(matches!(result, Err(PathError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_reported_and_resolved_on_request() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("target");
        std::fs::create_dir(&target).expect("Failed to create dir");
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link"))
            .expect("Failed to create symlink");

        let link = list_directory(temp_dir.path())
            .expect("Failed to list directory")
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.name == "link")
            .expect("Symlink should be listed");

        assert_eq!(link.kind, EntryKind::Symlink);
        assert_eq!(
            link.resolve_kind().expect("Symlink target exists"),
            Some(PathKind::Directory)
        );
    }
}
