use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use hashlink::LinkedHashMap;
use snafu::OptionExt;
use tracing::{debug, info, trace, warn};

use crate::filesystem::PathKind;
use crate::filesystem::error::{
    IoResultExt, PathError, UnsupportedKindSnafu, WrongKindSnafu, precondition,
};
use crate::filesystem::listing::list_directory;
use crate::filesystem::segment::{
    Segment, check_length, compose_child_path, derive_name, normalize, parent_path,
    validate_entry_name,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Contents {
    Unclassified,
    File {
        size_bytes: u64,
    },
    /// Child name, exactly as on disk, to child kind, in listing order.
    /// Child nodes are only built when navigation descends into one.
    Directory {
        entries: LinkedHashMap<OsString, PathKind>,
    },
}

/// How `remove` treats a directory that still has entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoveMode {
    /// Files and empty directories only.
    #[default]
    Single,
    /// Directories are removed with everything below them.
    Recursive,
}

/// Outcome of re-reading a node from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    pub previous: PathKind,
    pub current: PathKind,
}

impl Refresh {
    pub fn kind_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// One file or directory, as last read from disk.
///
/// The view is a snapshot: changes made by others show up only after
/// [`PathNode::refresh`] or a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    full_path: PathBuf,
    name: String,
    modified: Option<SystemTime>,
    contents: Contents,
}

impl Default for PathNode {
    fn default() -> Self {
        Self::create()
    }
}

impl PathNode {
    /// An empty node that has not been pointed at anything yet. The first
    /// [`PathNode::navigate`] call opens its segment as a path.
    pub fn create() -> Self {
        Self {
            full_path: PathBuf::new(),
            name: String::new(),
            modified: None,
            contents: Contents::Unclassified,
        }
    }

    /// Stats `path` and, for a directory, records every entry's name and kind
    /// from a single listing pass.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let full_path = normalize(path.as_ref());
        check_length(&full_path)?;
        debug!("Opening path {}", full_path.display());

        let mut node = Self {
            name: derive_name(&full_path),
            full_path,
            modified: None,
            contents: Contents::Unclassified,
        };
        node.load()?;
        Ok(node)
    }

    /// Re-reads kind, size and entries for the stored path. A node whose
    /// path changed kind on disk takes the new kind; the report says so.
    pub fn refresh(&mut self) -> Result<Refresh, PathError> {
        let previous = self.kind().ok_or_else(|| precondition(PathError::Uninitialized))?;
        self.load()?;
        let current = self.kind().ok_or(PathError::Uninitialized)?;

        let refresh = Refresh { previous, current };
        if refresh.kind_changed() {
            warn!(
                "{} changed from a {} to a {}",
                self.full_path.display(),
                previous,
                current
            );
        }
        Ok(refresh)
    }

    /// Moves this node by one segment and returns it.
    ///
    /// On a node from [`PathNode::create`] the segment is opened as a path.
    /// Otherwise the node must be a directory: `""` and `"."` leave it alone,
    /// `".."` goes to the parent, and a name descends into that entry. The
    /// node is rebuilt in place; on failure it is left untouched.
    pub fn navigate(&mut self, segment: &str) -> Result<&mut Self, PathError> {
        let Some(kind) = self.kind() else {
            *self = Self::open(segment)?;
            return Ok(self);
        };
        if kind != PathKind::Directory {
            return Err(precondition(self.wrong_kind(PathKind::Directory, kind)));
        }

        let target = match Segment::parse(segment).map_err(precondition)? {
            Segment::Current => return Ok(self),
            Segment::Parent => parent_path(&self.full_path),
            Segment::Child(name) => compose_child_path(&self.full_path, name)?,
        };
        debug!(
            "Navigating from {} to {}",
            self.full_path.display(),
            target.display()
        );

        *self = Self::open(target)?;
        Ok(self)
    }

    pub fn kind(&self) -> Option<PathKind> {
        match self.contents {
            Contents::Unclassified => None,
            Contents::File { .. } => Some(PathKind::File),
            Contents::Directory { .. } => Some(PathKind::Directory),
        }
    }

    /// `false` for directories, and for a node that was never opened.
    pub fn is_file(&self) -> bool {
        self.kind_or_report() == Some(PathKind::File)
    }

    pub fn is_directory(&self) -> bool {
        self.kind_or_report() == Some(PathKind::Directory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Byte length for a file, entry count for a directory.
    ///
    /// Prefer [`PathNode::file_size_bytes`] or
    /// [`PathNode::directory_entry_count`], which cannot be mistaken for
    /// one another.
    pub fn size(&self) -> u64 {
        match &self.contents {
            Contents::File { size_bytes } => *size_bytes,
            Contents::Directory { entries } => entries.len() as u64,
            Contents::Unclassified => {
                precondition(PathError::Uninitialized);
                0
            }
        }
    }

    pub fn file_size_bytes(&self) -> Option<u64> {
        match self.contents {
            Contents::File { size_bytes } => Some(size_bytes),
            _ => None,
        }
    }

    pub fn directory_entry_count(&self) -> Option<usize> {
        match &self.contents {
            Contents::Directory { entries } => Some(entries.len()),
            _ => None,
        }
    }

    /// Entry names in listing order. Returns the entry count; with `None` as
    /// the output slot only the count is computed.
    pub fn list_child_names<'a>(
        &'a self,
        names: Option<&mut Vec<&'a OsStr>>,
    ) -> Result<usize, PathError> {
        let entries = self.entries()?;
        if let Some(names) = names {
            names.extend(entries.keys().map(OsString::as_os_str));
        }
        Ok(entries.len())
    }

    /// Entry kinds, in the same order as [`PathNode::list_child_names`].
    pub fn list_child_kinds(&self, kinds: Option<&mut Vec<PathKind>>) -> Result<usize, PathError> {
        let entries = self.entries()?;
        if let Some(kinds) = kinds {
            kinds.extend(entries.values().copied());
        }
        Ok(entries.len())
    }

    pub fn child_kind(&self, name: impl AsRef<OsStr>) -> Option<PathKind> {
        match &self.contents {
            Contents::Directory { entries } => entries.get(name.as_ref()).copied(),
            _ => None,
        }
    }

    /// Calls `visitor` with each entry's full path, kind and position.
    pub fn for_each_child<F>(&self, mut visitor: F) -> Result<(), PathError>
    where
        F: FnMut(&Path, PathKind, usize),
    {
        for (index, (name, kind)) in self.entries()?.iter().enumerate() {
            visitor(&self.full_path.join(name), *kind, index);
        }
        Ok(())
    }

    /// Creates `file_name` inside this directory, truncating an existing
    /// file. Returns the created path.
    pub fn create_file(&mut self, file_name: &str) -> Result<PathBuf, PathError> {
        let path = self.entry_path(file_name)?;
        fs::File::create(&path).at_path(&path)?;
        info!("Created file {}", path.display());

        self.record_entry(file_name, PathKind::File);
        Ok(path)
    }

    pub fn create_directory(&mut self, directory_name: &str) -> Result<PathBuf, PathError> {
        let path = self.entry_path(directory_name)?;
        fs::create_dir(&path).at_path(&path)?;
        info!("Created directory {}", path.display());

        self.record_entry(directory_name, PathKind::Directory);
        Ok(path)
    }

    /// Removes the entry `name`. A non-empty directory is refused unless
    /// `mode` is [`RemoveMode::Recursive`]. Symlinks are removed, never
    /// followed.
    pub fn remove(&mut self, name: &str, mode: RemoveMode) -> Result<(), PathError> {
        let path = self.entry_path(name)?;
        let metadata = fs::symlink_metadata(&path).at_path(&path)?;

        if metadata.is_dir() {
            match mode {
                RemoveMode::Single => {
                    let has_entries = fs::read_dir(&path).at_path(&path)?.next().is_some();
                    if has_entries {
                        return Err(PathError::DirectoryNotEmpty { path });
                    }
                    fs::remove_dir(&path).at_path(&path)?;
                }
                RemoveMode::Recursive => fs::remove_dir_all(&path).at_path(&path)?,
            }
        } else {
            fs::remove_file(&path).at_path(&path)?;
        }
        info!("Removed {}", path.display());

        if let Contents::Directory { entries } = &mut self.contents {
            entries.remove(OsStr::new(name));
        }
        Ok(())
    }

    /// Releases the node. Equivalent to dropping it.
    pub fn close(self) {
        trace!("Closing {}", self.full_path.display());
    }

    fn load(&mut self) -> Result<(), PathError> {
        let metadata = fs::metadata(&self.full_path).at_path(&self.full_path)?;
        let kind = PathKind::from_metadata(&metadata).context(UnsupportedKindSnafu {
            path: &self.full_path,
        })?;

        let contents = match kind {
            PathKind::File => Contents::File {
                size_bytes: metadata.len(),
            },
            PathKind::Directory => Contents::Directory {
                entries: read_entries(&self.full_path)?,
            },
        };

        self.contents = contents;
        self.modified = metadata.modified().ok();
        Ok(())
    }

    fn entries(&self) -> Result<&LinkedHashMap<OsString, PathKind>, PathError> {
        match &self.contents {
            Contents::Directory { entries } => Ok(entries),
            Contents::File { .. } => {
                Err(precondition(self.wrong_kind(PathKind::Directory, PathKind::File)))
            }
            Contents::Unclassified => Err(precondition(PathError::Uninitialized)),
        }
    }

    /// Path of entry `name` in this directory, for create and remove.
    fn entry_path(&self, name: &str) -> Result<PathBuf, PathError> {
        self.entries()?;
        let name = validate_entry_name(name).map_err(precondition)?;
        compose_child_path(&self.full_path, name)
    }

    fn record_entry(&mut self, name: &str, kind: PathKind) {
        if let Contents::Directory { entries } = &mut self.contents {
            entries.replace(OsString::from(name), kind);
        }
    }

    fn kind_or_report(&self) -> Option<PathKind> {
        let kind = self.kind();
        if kind.is_none() {
            precondition(PathError::Uninitialized);
        }
        kind
    }

    fn wrong_kind(&self, expected: PathKind, found: PathKind) -> PathError {
        WrongKindSnafu {
            path: &self.full_path,
            expected,
            found,
        }
        .build()
    }
}

fn read_entries(path: &Path) -> Result<LinkedHashMap<OsString, PathKind>, PathError> {
    let mut entries = LinkedHashMap::new();
    for entry in list_directory(path)? {
        let entry = entry?;
        match entry.resolve_kind() {
            Ok(Some(kind)) => {
                entries.insert(entry.name, kind);
            }
            Ok(None) => debug!("Skipping {}: unsupported kind", entry.path.display()),
            Err(error) => debug!("Skipping {}: {}", entry.path.display(), error),
        }
    }
    Ok(entries)
}
