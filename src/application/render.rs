use colored::Colorize;
use pathtree::{PathError, PathKind, PathNode};

fn styled_name(name: &str, kind: Option<PathKind>) -> String {
    match kind {
        Some(PathKind::Directory) => format!("{}/", name).blue().bold().to_string(),
        _ => name.to_string(),
    }
}

/// One line naming the node and its size.
pub fn node_summary(node: &PathNode) -> String {
    let name = styled_name(node.name(), node.kind());
    match node.kind() {
        Some(PathKind::File) => format!("{} (file, {} bytes)", name, node.size()),
        Some(PathKind::Directory) => format!("{} (directory, {} entries)", name, node.size()),
        None => format!("{} (not opened)", name),
    }
}

/// One line per directory entry, in listing order.
pub fn node_listing(node: &PathNode) -> Result<Vec<String>, PathError> {
    let mut lines = Vec::new();
    node.for_each_child(|path, kind, index| {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push(format!("{:>4}  {}", index, styled_name(&name, Some(kind))));
    })?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn summarizes_and_lists_a_directory() {
        colored::control::set_override(false);
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(temp_dir.path().join("sub")).expect("Failed to create dir");
        std::fs::write(temp_dir.path().join("a.txt"), "abc").expect("Failed to write file");

        let node = PathNode::open(temp_dir.path()).expect("Failed to open directory");
        assert!(node_summary(&node).ends_with("/ (directory, 2 entries)"));

        let mut listing = node_listing(&node).expect("Failed to list directory");
        listing.sort();
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().any(|line| line.ends_with("  a.txt")));
        assert!(listing.iter().any(|line| line.ends_with("  sub/")));

        let file = PathNode::open(temp_dir.path().join("a.txt")).expect("Failed to open file");
        assert_eq!(node_summary(&file), "a.txt (file, 3 bytes)");
        assert!(node_listing(&file).is_err());
    }

    #[test]
    fn summarizes_an_unopened_node() {
        colored::control::set_override(false);
        assert_eq!(node_summary(&PathNode::create()), " (not opened)");
    }
}
