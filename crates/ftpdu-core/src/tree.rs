//! Arena-backed remote tree and statistics.

use std::cmp::Ordering;
use std::ops::Index;
use std::time::{Duration, SystemTime};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeKind, RemoteNode};
use crate::path;

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of folders, excluding the root.
    pub total_folders: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
    /// Largest file (path, size).
    pub largest_file: Option<(String, u64)>,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, path: &str, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path.to_string(), size));
        }
    }

    /// Record a folder.
    pub fn record_folder(&mut self, depth: u32) {
        self.total_folders += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// A scanned remote hierarchy.
///
/// Nodes live in a single arena owned by the tree. A folder owns its children
/// through `children`; the `parent` link is a plain [`NodeId`] and never keeps
/// anything alive. The root is always the first node and has no parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTree {
    nodes: Vec<RemoteNode>,

    /// Remote path the root folder corresponds to.
    pub root_path: String,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Summary statistics.
    pub stats: TreeStats,
}

impl RemoteTree {
    /// Create a tree holding only an empty root folder.
    pub fn new(root_name: impl Into<CompactString>) -> Self {
        Self {
            nodes: vec![RemoteNode::new_folder(NodeId::new(0), root_name, None)],
            root_path: String::new(),
            scanned_at: SystemTime::now(),
            scan_duration: Duration::ZERO,
            stats: TreeStats::new(),
        }
    }

    /// Identifier of the root folder.
    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    /// The root folder.
    pub fn root(&self) -> &RemoteNode {
        &self.nodes[0]
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&RemoteNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this only reports whether the root is empty.
    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    /// Append a new, empty folder to `parent`'s children.
    ///
    /// The folder's size is folded into its parent by [`complete_folder`](Self::complete_folder)
    /// once its subtree has been scanned.
    pub fn add_folder(&mut self, parent: NodeId, name: impl Into<CompactString>) -> NodeId {
        let id = self.next_id();
        self.nodes.push(RemoteNode::new_folder(id, name, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Append a file to `parent`'s children and add its size to the parent.
    pub fn add_file(&mut self, parent: NodeId, name: impl Into<CompactString>, size: u64) -> NodeId {
        let id = self.next_id();
        self.nodes.push(RemoteNode::new_file(id, name, size, parent));

        let parent = &mut self.nodes[parent.index()];
        parent.children.push(id);
        parent.size += size;
        if let NodeKind::Folder { file_count, .. } = &mut parent.kind {
            *file_count += 1;
        }
        id
    }

    /// Fold a finished folder's size and counts into its parent.
    ///
    /// Must be called exactly once per folder, after its last child was added.
    pub fn complete_folder(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        let Some(parent) = node.parent else {
            return;
        };
        let (size, files, folders) = (node.size, node.file_count(), node.folder_count());

        let parent = &mut self.nodes[parent.index()];
        parent.size += size;
        if let NodeKind::Folder {
            file_count,
            folder_count,
        } = &mut parent.kind
        {
            *file_count += files;
            *folder_count += folders + 1;
        }
    }

    /// Direct children of a node, in listing order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &RemoteNode> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(move |node| node.children.iter().map(move |child| &self.nodes[child.index()]))
    }

    /// Children of a node ordered by `compare`; equal entries keep listing order.
    pub fn sorted_children<F>(&self, id: NodeId, mut compare: F) -> Vec<NodeId>
    where
        F: FnMut(&RemoteNode, &RemoteNode) -> Ordering,
    {
        let mut ids = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        ids.sort_by(|a, b| compare(&self.nodes[a.index()], &self.nodes[b.index()]));
        ids
    }

    /// Enclosing folder of a node.
    pub fn parent(&self, id: NodeId) -> Option<&RemoteNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Walk from a node's parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &RemoteNode> + '_ {
        std::iter::successors(self.parent(id), move |node| self.parent(node.id))
    }

    /// Depth of a node below the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Full remote path of a node.
    pub fn path_of(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        if node.is_root() {
            return self.root_path.clone();
        }

        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter(|a| !a.is_root())
            .map(|a| a.name.as_str())
            .collect();
        names.reverse();
        names.push(node.name.as_str());

        names
            .into_iter()
            .fold(self.root_path.clone(), |acc, name| path::join(&acc, name))
    }

    /// Get the total size of the tree.
    pub fn total_size(&self) -> u64 {
        self.root().size
    }

    /// Get the total number of files.
    pub fn total_files(&self) -> u64 {
        self.root().file_count()
    }

    /// Get the total number of folders below the root.
    pub fn total_folders(&self) -> u64 {
        self.root().folder_count()
    }

    fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32)
    }
}

impl Index<NodeId> for RemoteTree {
    type Output = RemoteNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_stats_default() {
        let stats = TreeStats::default();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_folders, 0);
    }

    #[test]
    fn test_tree_stats_record_file() {
        let mut stats = TreeStats::new();

        stats.record_file("/pub/big.iso", 1024, 2);
        stats.record_file("/pub/small.txt", 12, 2);

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_size, 1036);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.largest_file, Some(("/pub/big.iso".to_string(), 1024)));
    }

    #[test]
    fn test_add_file_updates_parent() {
        let mut tree = RemoteTree::new("root");
        let root = tree.root_id();

        tree.add_file(root, "a", 10);
        tree.add_file(root, "b", 20);

        assert_eq!(tree.total_size(), 30);
        assert_eq!(tree.total_files(), 2);
        let names: Vec<_> = tree.children(root).map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_sorted_children_is_stable() {
        let mut tree = RemoteTree::new("root");
        let root = tree.root_id();
        tree.add_file(root, "a", 5);
        tree.add_file(root, "b", 9);
        tree.add_file(root, "c", 5);

        let ids = tree.sorted_children(root, |x, y| y.size.cmp(&x.size));
        let names: Vec<_> = ids.iter().map(|id| tree[*id].name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert!(tree.sorted_children(NodeId::new(99), |_, _| Ordering::Equal).is_empty());
    }

    #[test]
    fn test_folder_size_folds_on_completion() {
        let mut tree = RemoteTree::new("root");
        let root = tree.root_id();

        let sub = tree.add_folder(root, "sub");
        tree.add_file(sub, "x", 5);
        assert_eq!(tree.total_size(), 0);

        tree.complete_folder(sub);
        assert_eq!(tree.total_size(), 5);
        assert_eq!(tree.total_files(), 1);
        assert_eq!(tree.total_folders(), 1);
    }

    #[test]
    fn test_path_of() {
        let mut tree = RemoteTree::new("root");
        tree.root_path = "/srv".to_string();
        let root = tree.root_id();

        let sub = tree.add_folder(root, "sub");
        let file = tree.add_file(sub, "x", 5);

        assert_eq!(tree.path_of(root), "/srv");
        assert_eq!(tree.path_of(sub), "/srv/sub");
        assert_eq!(tree.path_of(file), "/srv/sub/x");
        assert_eq!(tree.depth(file), 2);
    }
}
