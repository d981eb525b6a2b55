use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, Metadata};
use std::ops::Index;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use derive_more::Display;
use snafu::OptionExt;
use tracing::{debug, warn};

use crate::filesystem::PathKind;
use crate::filesystem::error::{IoResultExt, PathError, UnsupportedKindSnafu};
use crate::filesystem::listing::{DirectoryEntry, EntryKind, list_directory};
use crate::filesystem::segment::{check_length, derive_name, normalize};

/// Handle to a node inside the [`PathTree`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeContents {
    File { size_bytes: u64 },
    Directory { children: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    full_path: PathBuf,
    parent: Option<NodeId>,
    modified: Option<SystemTime>,
    contents: TreeContents,
}

impl TreeNode {
    fn new(
        full_path: PathBuf,
        parent: Option<NodeId>,
        kind: PathKind,
        metadata: &Metadata,
    ) -> Self {
        let contents = match kind {
            PathKind::File => TreeContents::File {
                size_bytes: metadata.len(),
            },
            PathKind::Directory => TreeContents::Directory {
                children: Vec::new(),
            },
        };
        Self {
            name: derive_name(&full_path),
            full_path,
            parent,
            modified: metadata.modified().ok(),
            contents,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn contents(&self) -> &TreeContents {
        &self.contents
    }

    pub fn kind(&self) -> PathKind {
        match self.contents {
            TreeContents::File { .. } => PathKind::File,
            TreeContents::Directory { .. } => PathKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind().is_file()
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self.contents {
            TreeContents::File { size_bytes } => Some(size_bytes),
            TreeContents::Directory { .. } => None,
        }
    }

    /// Children in listing order. Empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.contents {
            TreeContents::Directory { children } => children,
            TreeContents::File { .. } => &[],
        }
    }
}

/// A child that could not be added to the tree.
#[derive(Debug)]
pub struct ChildFailure {
    pub path: PathBuf,
    pub error: PathError,
}

/// A fully materialized directory tree, read in one recursive pass.
///
/// Nodes live in an arena owned by the tree; parent links are [`NodeId`]s
/// into that arena. Children that fail to open are skipped and collected in
/// [`PathTree::failures`]. Symlinks below the root are never followed, so the
/// walk cannot loop.
#[derive(Debug)]
pub struct PathTree {
    nodes: Vec<TreeNode>,
    failures: Vec<ChildFailure>,
}

impl PathTree {
    /// Reads `path` and, if it is a directory, everything below it. Only a
    /// failure on `path` itself is returned as an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let root_path = normalize(path.as_ref());
        check_length(&root_path)?;
        debug!("Opening tree at {}", root_path.display());

        let metadata = fs::metadata(&root_path).at_path(&root_path)?;
        let kind = PathKind::from_metadata(&metadata).context(UnsupportedKindSnafu {
            path: &root_path,
        })?;

        let mut tree = Self {
            nodes: vec![TreeNode::new(root_path, None, kind, &metadata)],
            failures: Vec::new(),
        };

        if kind == PathKind::Directory {
            let mut pending = Vec::new();
            tree.populate(NodeId::ROOT, &mut pending)?;

            while let Some(directory) = pending.pop() {
                if let Err(error) = tree.populate(directory, &mut pending) {
                    let path = tree[directory].full_path.clone();
                    warn!("Failed to list {}: {}", path.display(), error);
                    tree.failures.push(ChildFailure { path, error });
                }
            }
        }

        debug!(
            "Opened tree with {} nodes and {} failures",
            tree.nodes.len(),
            tree.failures.len()
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TreeNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Matches the entry's name exactly as stored on disk.
    pub fn child_by_name(&self, id: NodeId, name: impl AsRef<OsStr>) -> Option<NodeId> {
        let name = name.as_ref();
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].full_path.file_name() == Some(name))
    }

    /// Resolves `relative` against the root, one component at a time.
    pub fn lookup(&self, relative: impl AsRef<Path>) -> Option<NodeId> {
        relative
            .as_ref()
            .components()
            .try_fold(self.root(), |current, component| match component {
                Component::CurDir => Some(current),
                Component::ParentDir => self.parent(current),
                Component::Normal(name) => self.child_by_name(current, name),
                Component::RootDir | Component::Prefix(_) => None,
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn failures(&self) -> &[ChildFailure] {
        &self.failures
    }

    /// Sum of all file sizes in the tree.
    pub fn total_size(&self) -> u64 {
        self.nodes.iter().filter_map(TreeNode::size_bytes).sum()
    }

    /// Pre-order walk from the root, children in listing order, yielding
    /// each node's id and depth.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![(self.root(), 0)],
        }
    }

    fn populate(&mut self, directory: NodeId, pending: &mut Vec<NodeId>) -> Result<(), PathError> {
        let directory_path = self.nodes[directory.0].full_path.clone();
        let mut children = Vec::new();

        for entry in list_directory(&directory_path)? {
            match self.add_child(entry, directory) {
                Ok(child) => {
                    if self.nodes[child.0].kind() == PathKind::Directory {
                        pending.push(child);
                    }
                    children.push(child);
                }
                Err(error) => {
                    let path = error_path(&error)
                        .unwrap_or(directory_path.as_path())
                        .to_path_buf();
                    warn!("Skipping {}: {}", path.display(), error);
                    self.failures.push(ChildFailure { path, error });
                }
            }
        }

        if let TreeContents::Directory { children: slot } = &mut self.nodes[directory.0].contents {
            *slot = children;
        }
        Ok(())
    }

    fn add_child(
        &mut self,
        entry: Result<DirectoryEntry, PathError>,
        parent: NodeId,
    ) -> Result<NodeId, PathError> {
        let entry = entry?;
        let EntryKind::Supported(kind) = entry.kind else {
            return UnsupportedKindSnafu { path: entry.path }.fail();
        };
        check_length(&entry.path)?;

        let metadata = fs::symlink_metadata(&entry.path).at_path(&entry.path)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(entry.path, Some(parent), kind, &metadata));
        Ok(id)
    }
}

fn error_path(error: &PathError) -> Option<&Path> {
    match error {
        PathError::NotFound { path, .. }
        | PathError::WrongKind { path, .. }
        | PathError::PathTooLong { path, .. }
        | PathError::AlreadyExists { path, .. }
        | PathError::DirectoryNotEmpty { path }
        | PathError::UnsupportedKind { path }
        | PathError::Io { path, .. } => Some(path),
        PathError::Uninitialized | PathError::InvalidSegment { .. } => None,
    }
}

impl Index<NodeId> for PathTree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}

pub struct DepthFirst<'a> {
    tree: &'a PathTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack.extend(
            self.tree
                .children(id)
                .iter()
                .rev()
                .map(|child| (*child, depth + 1)),
        );
        Some((id, depth))
    }
}

impl fmt::Display for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, depth) in self.iter() {
            let node = &self[id];
            let indent = "  ".repeat(depth);
            match node.contents {
                TreeContents::File { size_bytes } => {
                    writeln!(f, "{}{} ({} bytes)", indent, node.name, size_bytes)?
                }
                TreeContents::Directory { ref children } => {
                    writeln!(f, "{}{}/ ({} entries)", indent, node.name, children.len())?
                }
            }
        }
        Ok(())
    }
}
