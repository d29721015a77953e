//! Alpha-balanced binary search tree
//!
//! This module provides an ordered set backed by a binary search tree that
//! balances by subtree element count rather than height. It supports:
//! - Unique elements (duplicates are rejected, not counted)
//! - Deletion by successor promotion
//! - Optional self-balancing against a configured ratio alpha in (1/2, 1)
//! - In-order iteration, including removal of the last yielded element
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Children are
//! owning links; the parent link is a plain index used only to walk upward.

mod error;
mod iter;
mod node;
mod rebalance;

pub use error::{AbTreeError, AbTreeResult};
pub use iter::{Cursor, Iter};
pub use node::{Node, NodeId};

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

use tracing::trace;

use crate::config::{BalanceRatio, TreeConfig};

/// Alpha-balanced tree set
///
/// Every node caches the size of its subtree, so `len` is the root's count.
/// In self-balancing mode each structural change gives every ancestor of the
/// mutation point one chance to rebuild its subtree (see the `rebalance`
/// module).
#[derive(Debug, Clone)]
pub struct AbTreeSet<T> {
    /// Root node ID (None if tree is empty)
    root: Option<NodeId>,

    /// Balancing mode and ratio, fixed at construction
    config: TreeConfig,

    /// Node storage
    nodes: Vec<Option<Node<T>>>,

    /// Free list for recycling unlinked nodes
    free_list: Vec<NodeId>,
}

impl<T> AbTreeSet<T> {
    /// Create an empty tree that never rebalances
    pub fn new() -> Self {
        Self::from_valid_config(TreeConfig::unbalanced())
    }

    /// Create an empty tree; when `self_balancing` is set alpha is 2/3
    pub fn with_balancing(self_balancing: bool) -> Self {
        let config = if self_balancing {
            TreeConfig::balanced()
        } else {
            TreeConfig::unbalanced()
        };
        Self::from_valid_config(config)
    }

    /// Create an empty tree with alpha = top / bottom
    ///
    /// # Returns
    /// * `Ok(AbTreeSet)` - A new empty tree
    /// * `Err(AbTreeError::InvalidRatio)` - If self-balancing and alpha is
    ///   not strictly between 1/2 and 1
    pub fn with_ratio(self_balancing: bool, top: u32, bottom: u32) -> AbTreeResult<Self> {
        Self::with_config(TreeConfig::new(self_balancing, BalanceRatio::new(top, bottom))?)
    }

    /// Create an empty tree from a configuration, validating it first
    pub fn with_config(config: TreeConfig) -> AbTreeResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TreeConfig) -> Self {
        Self {
            root: None,
            config,
            nodes: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Get the tree configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get number of elements in the tree (the root's count)
    pub fn len(&self) -> usize {
        self.subtree_count(self.root)
    }

    /// Alias of [`len`](Self::len)
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Get tree height (0 for an empty tree, 1 for a single node)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();

        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&id| {
                    let node = self.node(id);
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }

        height
    }

    // ========== Node Management ==========

    /// Allocate a new node, returning its ID
    fn allocate_node(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            let id = self.nodes.len();
            self.nodes.push(Some(node));
            id
        }
    }

    /// Free a node, adding its slot to the free list
    fn free_node(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.nodes.get_mut(id)?.take()?;
        self.free_list.push(id);
        Some(node)
    }

    /// Get a read-only view of a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    /// Get the root node ID
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a linked node
    ///
    /// Ids reached through `root`, `left`, `right` or `parent` always name
    /// live slots; a dangling one means the arena is corrupted.
    fn node(&self, id: NodeId) -> &Node<T> {
        match self.nodes.get(id) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling node id {id}"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.nodes.get_mut(id) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling node id {id}"),
        }
    }

    /// Mutable access to a stored element
    ///
    /// Callers must not change how the element orders; the map uses this to
    /// replace an entry's value in place.
    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)
            .and_then(|n| n.as_mut())
            .map(|node| &mut node.element)
    }

    fn subtree_count(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).count)
    }

    /// Walk from `from` to the root adjusting every count by one
    fn update_ancestor_counts(&mut self, from: Option<NodeId>, grew: bool) {
        let mut current = from;

        while let Some(id) = current {
            let node = self.node_mut(id);
            if grew {
                node.count += 1;
            } else {
                node.count -= 1;
            }
            current = node.parent;
        }
    }

    // ========== Navigation ==========

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    /// Get the node holding the next larger element
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get_node(id)?;

        if let Some(right) = node.right {
            return Some(self.leftmost(right));
        }

        // Climb until we arrive from a left child
        let mut child = id;
        let mut current = node.parent;
        while let Some(parent_id) = current {
            let parent = self.node(parent_id);
            if parent.left == Some(child) {
                return Some(parent_id);
            }
            child = parent_id;
            current = parent.parent;
        }

        None
    }

    /// Node IDs of the subtree rooted at `subtree_root`, in order
    ///
    /// Builds a fresh list on every call; an unknown id yields an empty list.
    pub fn inorder(&self, subtree_root: NodeId) -> Vec<NodeId> {
        let Some(root) = self.get_node(subtree_root) else {
            return Vec::new();
        };

        let mut ids = Vec::with_capacity(root.count);
        let mut stack = Vec::new();
        let mut current = Some(subtree_root);

        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).left;
            }

            let Some(id) = stack.pop() else {
                break;
            };
            ids.push(id);
            current = self.node(id).right;
        }

        ids
    }

    /// Node IDs of the subtree rooted at `subtree_root`, parents first
    pub fn preorder(&self, subtree_root: NodeId) -> Vec<NodeId> {
        let Some(root) = self.get_node(subtree_root) else {
            return Vec::new();
        };

        let mut ids = Vec::with_capacity(root.count);
        let mut stack = vec![subtree_root];

        while let Some(id) = stack.pop() {
            ids.push(id);
            let node = self.node(id);
            stack.extend(node.right);
            stack.extend(node.left);
        }

        ids
    }

    // ========== Delete Operations ==========

    /// Remove the node `id` from the tree, returning its element
    ///
    /// A node with two children takes over its successor's element and the
    /// successor node is spliced out instead, so `id` stays live in that
    /// case. Runs the self-balance sweep afterwards.
    pub fn unlink(&mut self, id: NodeId) -> AbTreeResult<T> {
        let (element, sweep_from) = self.unlink_node(id)?;
        self.self_balance_sweep(sweep_from);
        Ok(element)
    }

    /// Structural removal without rebalancing
    ///
    /// Returns the removed element and the node the self-balance sweep
    /// should start from: the spliced node's former parent, or the new root
    /// when the root itself was spliced.
    fn unlink_node(&mut self, id: NodeId) -> AbTreeResult<(T, Option<NodeId>)> {
        let target = self.get_node(id).ok_or(AbTreeError::NodeNotFound(id))?;

        let spliced = match target.right {
            Some(right) if target.left.is_some() => self.leftmost(right),
            _ => id,
        };

        let (child, parent) = {
            let node = self.node(spliced);
            (node.single_child(), node.parent)
        };

        match parent {
            None => self.root = child,
            Some(parent_id) => {
                let parent_node = self.node_mut(parent_id);
                if parent_node.left == Some(spliced) {
                    parent_node.left = child;
                } else {
                    parent_node.right = child;
                }
            }
        }

        if let Some(child_id) = child {
            self.node_mut(child_id).parent = parent;
        }

        self.update_ancestor_counts(parent, false);

        let removed = self
            .free_node(spliced)
            .ok_or(AbTreeError::NodeNotFound(spliced))?;

        let element = if spliced == id {
            removed.element
        } else {
            mem::replace(&mut self.node_mut(id).element, removed.element)
        };

        trace!(node = id, spliced, len = self.len(), "unlinked node");

        Ok((element, parent.or(self.root)))
    }

    // ========== Iterators ==========

    /// Iterate over all elements in ascending order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// In-order cursor that can remove the element it last yielded
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor::new(self)
    }
}

impl<T: Ord> AbTreeSet<T> {
    // ========== Search Operations ==========

    /// Find the node whose element compares equal to `element`
    pub fn search<Q>(&self, element: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;

        while let Some(id) = current {
            let node = self.node(id);
            current = match element.cmp(node.element.borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }

        None
    }

    /// Get the stored element equal to `element`
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(element).map(|id| &self.node(id).element)
    }

    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(element).is_some()
    }

    // ========== Insert Operations ==========

    /// Insert an element
    ///
    /// Returns false, leaving the tree untouched, if an equal element is
    /// already present.
    pub fn insert(&mut self, element: T) -> bool {
        let Some(mut current) = self.root else {
            let id = self.allocate_node(Node::leaf(element, None));
            self.root = Some(id);
            trace!(node = id, "inserted root");
            return true;
        };

        let (parent, is_left) = loop {
            let node = self.node(current);
            let (child, is_left) = match element.cmp(&node.element) {
                Ordering::Equal => return false,
                Ordering::Less => (node.left, true),
                Ordering::Greater => (node.right, false),
            };

            match child {
                Some(child) => current = child,
                None => break (current, is_left),
            }
        };

        let leaf = self.allocate_node(Node::leaf(element, Some(parent)));
        let parent_node = self.node_mut(parent);
        if is_left {
            parent_node.left = Some(leaf);
        } else {
            parent_node.right = Some(leaf);
        }

        self.update_ancestor_counts(Some(parent), true);
        trace!(node = leaf, parent, len = self.len(), "inserted leaf");

        self.self_balance_sweep(Some(leaf));
        true
    }

    // ========== Delete Operations ==========

    /// Delete the element equal to `element`
    /// Returns true if an element was deleted
    pub fn delete<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(element).is_some()
    }

    /// Remove and return the element equal to `element`
    pub fn take<Q>(&mut self, element: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(element)?;
        self.unlink(id).ok()
    }
}

impl<T> Default for AbTreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a AbTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> AbTreeSet<T> {
    fn write_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: Option<NodeId>,
        depth: usize,
    ) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 4)?;

        let Some(id) = id else {
            return writeln!(f, "null");
        };

        let node = self.node(id);
        writeln!(f, "{}", node.element)?;

        // Leaves print no null markers for their missing children
        if !node.is_leaf() {
            self.write_subtree(f, node.left, depth + 1)?;
            self.write_subtree(f, node.right, depth + 1)?;
        }

        Ok(())
    }
}

/// Structural dump: one line per node, indented four spaces per level
impl<T: fmt::Display> fmt::Display for AbTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_subtree(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(elements: &[i32]) -> AbTreeSet<i32> {
        let mut tree = AbTreeSet::new();
        for &e in elements {
            tree.insert(e);
        }
        tree
    }

    fn elements(tree: &AbTreeSet<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    #[test]
    fn test_new_tree() {
        let tree: AbTreeSet<i32> = AbTreeSet::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root(), None);
        assert!(!tree.config().self_balancing);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(AbTreeSet::<i32>::with_ratio(true, 1, 2).is_err());
        assert!(AbTreeSet::<i32>::with_ratio(true, 1, 1).is_err());
        assert!(AbTreeSet::<i32>::with_ratio(true, 3, 2).is_err());
        assert!(AbTreeSet::<i32>::with_ratio(true, 3, 4).is_ok());
        // Ratio is ignored without self-balancing
        assert!(AbTreeSet::<i32>::with_ratio(false, 0, 0).is_ok());
    }

    #[test]
    fn test_with_balancing_uses_default_ratio() {
        let tree: AbTreeSet<i32> = AbTreeSet::with_balancing(true);
        assert!(tree.config().self_balancing);
        assert_eq!(tree.config().ratio, BalanceRatio::new(2, 3));
    }

    #[test]
    fn test_single_insert_and_search() {
        let mut tree = AbTreeSet::new();

        assert!(tree.insert(42));

        assert!(!tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.search(&42), tree.root());
        assert_eq!(tree.search(&41), None);
        assert_eq!(tree.get(&42), Some(&42));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut tree = tree_of(&[10, 20, 30]);

        assert!(!tree.insert(20));
        assert!(!tree.insert(10));
        assert_eq!(tree.len(), 3);
        assert_eq!(elements(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn test_search_structure() {
        let tree = tree_of(&[5, 3, 8, 1, 4]);

        let id = tree.search(&4).unwrap();
        let node = tree.get_node(id).unwrap();
        assert_eq!(node.count(), 1);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(*node.element(), 4);

        let parent = tree.get_node(node.parent().unwrap()).unwrap();
        assert_eq!(*parent.element(), 3);
        assert_eq!(parent.count(), 3);

        assert_eq!(tree.search(&6), None);
        assert_eq!(tree.get_node(tree.root().unwrap()).unwrap().count(), 5);
    }

    #[test]
    fn test_successor() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let element_of = |id: Option<NodeId>| id.map(|id| *tree.get_node(id).unwrap().element());

        // Right subtree exists: leftmost of it
        assert_eq!(element_of(tree.successor(tree.search(&5).unwrap())), Some(7));
        // No right subtree: first ancestor reached from the left
        assert_eq!(element_of(tree.successor(tree.search(&4).unwrap())), Some(5));
        assert_eq!(element_of(tree.successor(tree.search(&1).unwrap())), Some(3));
        // Maximum has no successor
        assert_eq!(tree.successor(tree.search(&9).unwrap()), None);
    }

    #[test]
    fn test_traversals() {
        let tree = tree_of(&[5, 3, 8, 1, 4]);
        let root = tree.root().unwrap();
        let to_elements =
            |ids: Vec<NodeId>| -> Vec<i32> { ids.into_iter().map(|id| *tree.node(id).element()).collect() };

        assert_eq!(to_elements(tree.inorder(root)), vec![1, 3, 4, 5, 8]);
        assert_eq!(to_elements(tree.preorder(root)), vec![5, 3, 1, 4, 8]);

        let left = tree.search(&3).unwrap();
        assert_eq!(to_elements(tree.inorder(left)), vec![1, 3, 4]);
        assert_eq!(to_elements(tree.preorder(left)), vec![3, 1, 4]);

        // Each call builds a fresh sequence
        assert_eq!(tree.inorder(root), tree.inorder(root));
        assert!(tree.inorder(999).is_empty());
    }

    #[test]
    fn test_delete_leaf() {
        let mut tree = tree_of(&[5, 3, 8]);

        assert!(tree.delete(&3));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(&3), None);
        assert_eq!(elements(&tree), vec![5, 8]);
    }

    #[test]
    fn test_delete_not_found() {
        let mut tree = tree_of(&[10]);

        assert!(!tree.delete(&20));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_delete_two_children_promotes_successor() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let root = tree.root().unwrap();

        assert!(tree.delete(&5));

        // Root slot survives holding the successor's element
        assert_eq!(tree.root(), Some(root));
        assert_eq!(*tree.get_node(root).unwrap().element(), 7);
        assert_eq!(tree.get_node(root).unwrap().count(), 6);
        assert_eq!(elements(&tree), vec![1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn test_delete_root_with_one_child() {
        let mut tree = tree_of(&[5, 8, 7]);

        assert!(tree.delete(&5));

        let root = tree.get_node(tree.root().unwrap()).unwrap();
        assert_eq!(*root.element(), 8);
        assert_eq!(root.parent(), None);
        assert_eq!(root.count(), 2);
    }

    #[test]
    fn test_delete_until_empty() {
        let mut tree = tree_of(&[10, 20, 30]);

        assert!(tree.delete(&10));
        assert!(tree.delete(&20));
        assert!(tree.delete(&30));

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_take_returns_element() {
        let mut tree = tree_of(&[2, 1, 3]);

        assert_eq!(tree.take(&2), Some(2));
        assert_eq!(tree.take(&2), None);
        assert_eq!(elements(&tree), vec![1, 3]);
    }

    #[test]
    fn test_unlink_by_id() {
        let mut tree = tree_of(&[5, 3, 8]);
        let id = tree.search(&8).unwrap();

        assert_eq!(tree.unlink(id), Ok(8));
        assert_eq!(tree.unlink(id), Err(AbTreeError::NodeNotFound(id)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_node_slots_recycled() {
        let mut tree = tree_of(&[1, 2, 3]);
        let freed = tree.search(&3).unwrap();

        tree.delete(&3);
        tree.insert(4);

        assert_eq!(tree.search(&4), Some(freed));
        assert_eq!(tree.nodes.len(), 3);
    }

    #[test]
    fn test_structural_dump() {
        let tree = tree_of(&[5, 3, 8, 1, 4]);
        let expected = "5\n    3\n        1\n        4\n    8\n";
        assert_eq!(tree.to_string(), expected);

        let tree = tree_of(&[5, 8]);
        assert_eq!(tree.to_string(), "5\n    null\n    8\n");

        let empty: AbTreeSet<i32> = AbTreeSet::new();
        assert_eq!(empty.to_string(), "null\n");
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut tree = AbTreeSet::new();
        tree.insert("pear".to_string());
        tree.insert("apple".to_string());

        assert!(tree.contains("apple"));
        assert!(!tree.contains("plum"));
        assert!(tree.delete("pear"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_negative_and_degenerate_order() {
        let tree = tree_of(&(-50..50).collect::<Vec<_>>());

        assert_eq!(tree.len(), 100);
        // Unbalanced trees keep the insertion shape
        assert_eq!(tree.height(), 100);
        assert_eq!(elements(&tree), (-50..50).collect::<Vec<_>>());
    }
}
