use std::fs::Metadata;

use derive_more::Display;

/// The two kinds of filesystem object a path node can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PathKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

impl PathKind {
    /// Classifies stat output. Sockets, FIFOs, devices and unresolved
    /// symlinks have no kind here.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        if metadata.is_dir() {
            Some(PathKind::Directory)
        } else if metadata.is_file() {
            Some(PathKind::File)
        } else {
            None
        }
    }

    pub fn is_file(self) -> bool {
        self == PathKind::File
    }

    pub fn is_directory(self) -> bool {
        self == PathKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classifies_files_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, b"hello").expect("Failed to write file");

        let file_metadata = std::fs::metadata(&file).expect("Failed to stat file");
        let dir_metadata = std::fs::metadata(temp_dir.path()).expect("Failed to stat dir");

        assert_eq!(PathKind::from_metadata(&file_metadata), Some(PathKind::File));
        assert_eq!(
            PathKind::from_metadata(&dir_metadata),
            Some(PathKind::Directory)
        );
    }

    #[test]
    fn displays_lowercase_names() {
        assert_eq!(PathKind::File.to_string(), "file");
        assert_eq!(PathKind::Directory.to_string(), "directory");
    }
}
