//! Folder and file node types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Index of a node within a [`RemoteTree`](crate::RemoteTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw index.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of remote entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Leaf entry with a definite byte size.
    File,
    /// Container entry.
    Folder {
        /// Number of files in this subtree.
        file_count: u64,
        /// Number of folders in this subtree, excluding itself.
        folder_count: u64,
    },
}

impl NodeKind {
    /// An empty folder.
    pub fn empty_folder() -> Self {
        NodeKind::Folder {
            file_count: 0,
            folder_count: 0,
        }
    }

    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder { .. })
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A single remote file or folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteNode {
    /// Identifier of this node.
    pub id: NodeId,

    /// Entry name (last path segment, never a full path).
    pub name: CompactString,

    /// Node type.
    pub kind: NodeKind,

    /// Size in bytes (aggregate of all descendant files for folders).
    pub size: u64,

    /// Enclosing folder; `None` only for the root.
    pub parent: Option<NodeId>,

    /// Children in the order the server listed them.
    pub children: Vec<NodeId>,
}

impl RemoteNode {
    pub(crate) fn new_folder(id: NodeId, name: impl Into<CompactString>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::empty_folder(),
            size: 0,
            parent,
            children: Vec::new(),
        }
    }

    pub(crate) fn new_file(
        id: NodeId,
        name: impl Into<CompactString>,
        size: u64,
        parent: NodeId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::File,
            size,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this node is the tree root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// File count for folders, 1 for files.
    pub fn file_count(&self) -> u64 {
        match self.kind {
            NodeKind::Folder { file_count, .. } => file_count,
            NodeKind::File => 1,
        }
    }

    /// Folder count below this node.
    pub fn folder_count(&self) -> u64 {
        match self.kind {
            NodeKind::Folder { folder_count, .. } => folder_count,
            NodeKind::File => 0,
        }
    }
}
