//! Files and directories as in-memory nodes: classify a path, list a
//! directory lazily or read a whole tree, move between nodes with relative
//! segments, and create or remove entries.

pub mod ext;
pub mod filesystem;

pub use filesystem::{
    MAX_PATH_LEN, NodeId, PathError, PathKind, PathNode, PathTree, Refresh, RemoveMode,
};
