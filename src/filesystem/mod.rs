//! Path nodes over the real filesystem.
//!
//! A [`PathNode`] describes one file or directory and records a directory's
//! entries as a name to kind mapping, building a node for an entry only when
//! navigation descends into it. A [`PathTree`] reads a whole hierarchy
//! eagerly. Both are snapshots: they never notice changes on disk until asked
//! to re-read.

mod error;
mod kind;
mod listing;
mod node;
mod segment;
mod tree;

#[cfg(test)]
mod fixtures;

/// Longest path, in bytes, any operation will build or open.
pub const MAX_PATH_LEN: usize = 4096;

pub use error::PathError;
pub use kind::PathKind;
pub use listing::{DirectoryEntry, EntryKind, list_directory};
pub use node::{PathNode, Refresh, RemoveMode};
pub use segment::{Segment, derive_name, normalize, parent_path};
pub use tree::{ChildFailure, DepthFirst, NodeId, PathTree, TreeContents, TreeNode};
