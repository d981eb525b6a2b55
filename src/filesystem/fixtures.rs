//! On-disk layout shared by the filesystem tests.
//!
//! ```text
//! test cases/
//! ├── file.txt                (0 bytes)
//! ├── file size.txt           (34 bytes)
//! ├── directory/
//! │   └── nested/
//! ├── directory file/
//! │   └── file.txt            (0 bytes)
//! ├── directory files/
//! │   ├── file 1.txt          (5 bytes)
//! │   ├── file 2.txt          (8 bytes)
//! │   └── file 3.txt          (6 bytes)
//! └── directory mixed/
//!     ├── notes.txt           (5 bytes)
//!     └── inner/
//!         └── deep.txt        (4 bytes)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

pub const FILE_SIZE_CONTENTS: &str = "This file is exactly 34 bytes long";

pub struct TestCases {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestCases {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

#[fixture]
pub fn test_cases() -> TestCases {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path().join("test cases");

    let files: [(&str, &str); 8] = [
        ("file.txt", ""),
        ("file size.txt", FILE_SIZE_CONTENTS),
        ("directory file/file.txt", ""),
        ("directory files/file 1.txt", "Hello"),
        ("directory files/file 2.txt", "Hi there"),
        ("directory files/file 3.txt", "Howdy!"),
        ("directory mixed/notes.txt", "notes"),
        ("directory mixed/inner/deep.txt", "deep"),
    ];

    fs::create_dir_all(root.join("directory/nested")).expect("Failed to create directory");
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write test file");
    }

    TestCases {
        _temp_dir: temp_dir,
        root,
    }
}
