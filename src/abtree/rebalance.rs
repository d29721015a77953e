//! Weight-based subtree rebuilding
//!
//! A node is weight-imbalanced when its heavier child holds more than
//! alpha of the whole tree. Imbalanced subtrees are flattened to their
//! in-order node sequence and relinked around lower medians. Only links and
//! counts change; every element stays in its slot.
//!
//! Nodes whose parent is the tree root are never rebuilt, and nodes within
//! the ratio are left alone, so rebalancing stays local and amortized.

use tracing::debug;

use super::{AbTreeSet, NodeId};

impl<T> AbTreeSet<T> {
    /// Check the weight-balance trigger for `id`
    ///
    /// Always false when self-balancing is off, for unknown ids, and for
    /// children of the root.
    pub fn weight_imbalanced(&self, id: NodeId) -> bool {
        if !self.config.self_balancing {
            return false;
        }

        let Some(node) = self.get_node(id) else {
            return false;
        };

        if node.parent.is_some() && node.parent == self.root {
            return false;
        }

        let heavier = self.subtree_count(node.left).max(self.subtree_count(node.right));
        let ratio = self.config.ratio;

        heavier as u64 * u64::from(ratio.bottom) > self.len() as u64 * u64::from(ratio.top)
    }

    /// Rebuild the subtree rooted at `id` if it is weight-imbalanced
    ///
    /// Returns the ID now rooting that subtree position (`id` itself when
    /// nothing changed).
    pub fn rebalance_subtree(&mut self, id: NodeId) -> NodeId {
        if !self.weight_imbalanced(id) {
            return id;
        }

        let parent = self.node(id).parent;
        let was_left = parent.is_some_and(|p| self.node(p).left == Some(id));

        let ids = self.inorder(id);
        let Some(new_root) = self.build_balanced(&ids, parent) else {
            return id;
        };

        match parent {
            None => self.root = Some(new_root),
            Some(parent_id) if was_left => self.node_mut(parent_id).left = Some(new_root),
            Some(parent_id) => self.node_mut(parent_id).right = Some(new_root),
        }

        debug!(
            old_root = id,
            new_root,
            size = ids.len(),
            "rebuilt weight-imbalanced subtree"
        );

        new_root
    }

    /// Link `ids` (in order) into a balanced subtree under `parent`
    ///
    /// Recurses on sub-slices of the one sequence and sets each node's count
    /// on the way back up.
    fn build_balanced(&mut self, ids: &[NodeId], parent: Option<NodeId>) -> Option<NodeId> {
        if ids.is_empty() {
            return None;
        }

        // Lower median: L/2 for odd lengths, L/2 - 1 for even ones
        let pivot = (ids.len() - 1) / 2;
        let id = ids[pivot];

        let left = self.build_balanced(&ids[..pivot], Some(id));
        let right = self.build_balanced(&ids[pivot + 1..], Some(id));
        let count = 1 + self.subtree_count(left) + self.subtree_count(right);

        let node = self.node_mut(id);
        node.left = left;
        node.right = right;
        node.parent = parent;
        node.count = count;

        Some(id)
    }

    /// Give `start` and each of its ancestors one rebalancing chance
    pub(super) fn self_balance_sweep(&mut self, start: Option<NodeId>) {
        if !self.config.self_balancing {
            return;
        }

        let mut current = start;
        while let Some(id) = current {
            let subtree_root = self.rebalance_subtree(id);
            current = self.node(subtree_root).parent;
        }
    }
}
