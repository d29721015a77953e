use super::{AbTreeError, AbTreeResult, AbTreeSet, NodeId};

/// Iterator over tree elements in ascending order
pub struct Iter<'a, T> {
    tree: &'a AbTreeSet<T>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(tree: &'a AbTreeSet<T>) -> Self {
        Self {
            tree,
            next: tree.root.map(|root| tree.leftmost(root)),
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.next?;

        self.next = tree.successor(id);
        self.remaining -= 1;
        Some(&tree.node(id).element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// In-order cursor that can remove the element it last yielded
///
/// `cursor` is the node holding the next element to yield and `pending` the
/// node that held the last one. Removing a node with two children moves its
/// successor's element into it, so the cursor is pointed back at that node
/// to yield the promoted element next.
pub struct Cursor<'a, T> {
    tree: &'a mut AbTreeSet<T>,
    cursor: Option<NodeId>,
    pending: Option<NodeId>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(tree: &'a mut AbTreeSet<T>) -> Self {
        let cursor = tree.root.map(|root| tree.leftmost(root));
        Self {
            tree,
            cursor,
            pending: None,
        }
    }

    /// Check if another element remains
    pub fn has_next(&self) -> bool {
        self.cursor.is_some()
    }

    /// Look at the next element without advancing
    pub fn peek(&self) -> Option<&T> {
        self.cursor.map(|id| &self.tree.node(id).element)
    }

    /// Yield the next element
    pub fn advance(&mut self) -> AbTreeResult<&T> {
        let id = self.cursor.ok_or(AbTreeError::NoMoreElements)?;

        self.pending = Some(id);
        self.cursor = self.tree.successor(id);
        Ok(&self.tree.node(id).element)
    }

    /// Remove the element returned by the last `advance`
    ///
    /// Fails with `InvalidState` if nothing has been yielded since the
    /// cursor was created or since the previous removal.
    pub fn remove_last(&mut self) -> AbTreeResult<T> {
        let pending = self.pending.take().ok_or_else(|| {
            AbTreeError::InvalidState("remove_last requires a preceding advance".to_string())
        })?;

        let node = self
            .tree
            .get_node(pending)
            .ok_or(AbTreeError::NodeNotFound(pending))?;

        if node.has_two_children() {
            self.cursor = Some(pending);
        }

        self.tree.unlink(pending)
    }
}
