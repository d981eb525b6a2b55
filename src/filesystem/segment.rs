use std::path::{Path, PathBuf};

use crate::filesystem::error::{InvalidSegmentSnafu, PathError, PathTooLongSnafu};
use crate::filesystem::MAX_PATH_LEN;

/// One relative navigation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `""` or `"."`
    Current,
    /// `".."`
    Parent,
    Child(&'a str),
}

impl<'a> Segment<'a> {
    pub fn parse(segment: &'a str) -> Result<Self, PathError> {
        match segment {
            "" | "." => Ok(Segment::Current),
            ".." => Ok(Segment::Parent),
            s if s.starts_with('.') => InvalidSegmentSnafu {
                segment: s,
                reason: "only '.' and '..' may start with a dot",
            }
            .fail(),
            s if has_separator(s) => InvalidSegmentSnafu {
                segment: s,
                reason: "navigation moves exactly one level",
            }
            .fail(),
            s => Ok(Segment::Child(s)),
        }
    }
}

/// Checks a name handed to create/remove: one real path component.
pub fn validate_entry_name(name: &str) -> Result<&str, PathError> {
    let reason = match name {
        "" => "name is empty",
        "." | ".." => "name refers to a directory itself",
        s if has_separator(s) => "name contains a path separator",
        s => return Ok(s),
    };
    InvalidSegmentSnafu {
        segment: name,
        reason,
    }
    .fail()
}

fn has_separator(s: &str) -> bool {
    s.chars().any(std::path::is_separator)
}

/// Final segment of `path`. A path ending in `/`, `.` or `..` is named by
/// that last component.
pub fn derive_name(path: &Path) -> String {
    path.components()
        .next_back()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lexical cleanup: repeated and trailing separators and interior `.`
/// components go away. `..` is kept as written.
pub fn normalize(path: &Path) -> PathBuf {
    let normalized = path.components().collect::<PathBuf>();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// The path one level up from `path`, computed from the text alone.
pub fn parent_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(_) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        // the filesystem root is its own parent
        None if path.has_root() && path.parent().is_none() => path.to_path_buf(),
        None if path == Path::new(".") => PathBuf::from(".."),
        None => path.join(".."),
    }
}

pub fn check_length(path: &Path) -> Result<(), PathError> {
    let length = path.as_os_str().len();
    if length > MAX_PATH_LEN {
        return PathTooLongSnafu { path, length }.fail();
    }
    Ok(())
}

/// `base` joined with a single entry name, within the length ceiling.
pub fn compose_child_path(base: &Path, name: &str) -> Result<PathBuf, PathError> {
    let composed = base.join(name);
    check_length(&composed)?;
    Ok(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Segment::Current)]
    #[case(".", Segment::Current)]
    #[case("..", Segment::Parent)]
    #[case("child", Segment::Child("child"))]
    #[case("file 1.txt", Segment::Child("file 1.txt"))]
    #[case("trailing.", Segment::Child("trailing."))]
    fn parses_sanctioned_segments(#[case] raw: &str, #[case] expected: Segment) {
        assert_eq!(Segment::parse(raw).expect("segment should parse"), expected);
    }

    #[rstest]
    #[case(".x")]
    #[case("...")]
    #[case("./a")]
    #[case(".hidden")]
    #[case("a/b")]
    #[case("/absolute")]
    fn rejects_malformed_segments(#[case] raw: &str) {
        assert!(matches!(
            Segment::parse(raw),
            Err(PathError::InvalidSegment { .. })
        ));
    }

    #[rstest]
    #[case("x.txt", true)]
    #[case(".gitignore", true)]
    #[case("", false)]
    #[case(".", false)]
    #[case("..", false)]
    #[case("a/b", false)]
    fn validates_entry_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(validate_entry_name(name).is_ok(), valid);
    }

    #[rstest]
    #[case("test cases/file size.txt", "file size.txt")]
    #[case("test cases/directory/", "directory")]
    #[case("plain", "plain")]
    #[case("/", "/")]
    #[case(".", ".")]
    #[case("..", "..")]
    #[case("../..", "..")]
    #[case("a/..", "..")]
    fn derives_final_segment(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(derive_name(Path::new(path)), expected);
    }

    #[rstest]
    #[case("test cases/directory/", "test cases/directory")]
    #[case("a//b///c", "a/b/c")]
    #[case("a/./b", "a/b")]
    #[case("a/../b", "a/../b")]
    #[case("", ".")]
    fn normalizes_lexically(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(Path::new(raw)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("a/b/c", "a/b")]
    #[case("dir", ".")]
    #[case(".", "..")]
    #[case("/", "/")]
    #[case("a/..", "a/../..")]
    fn computes_parent_from_text(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(parent_path(Path::new(path)), PathBuf::from(expected));
    }

    #[test]
    fn child_path_respects_length_ceiling() {
        let base = PathBuf::from("base");
        assert_eq!(
            compose_child_path(&base, "x.txt").expect("short path should compose"),
            PathBuf::from("base/x.txt")
        );

        let long_name = "n".repeat(MAX_PATH_LEN);
        match compose_child_path(&base, &long_name) {
            Err(PathError::PathTooLong { length, .. }) => {
                assert_eq!(length, "base/".len() + MAX_PATH_LEN)
            }
            other => panic!("Expected PathTooLong, got {:?}", other),
        }
    }
}
