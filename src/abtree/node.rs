/// Node identifier (index into node storage)
pub type NodeId = usize;

/// A tree vertex stored in the arena
///
/// Children are owning links: a node slot is only reachable through its
/// parent's `left`/`right` (or the tree root). `parent` is a plain back
/// index used for upward navigation.
///
/// Fields are private to the tree module; collaborators only ever receive
/// `&Node<T>` and read it through the accessors below.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(super) element: T,
    /// Number of elements in the subtree rooted here, including this node
    pub(super) count: usize,
    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl<T> Node<T> {
    /// Create a detached leaf holding `element`
    pub(super) fn leaf(element: T, parent: Option<NodeId>) -> Self {
        Self {
            element,
            count: 1,
            left: None,
            right: None,
            parent,
        }
    }

    /// Size of the subtree rooted at this node
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Check if this node has both children
    pub fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// The only child of this node, if it has at most one
    ///
    /// Returns `None` both for leaves and for nodes with two children;
    /// callers splicing a node out check `has_two_children` first.
    pub(super) fn single_child(&self) -> Option<NodeId> {
        match (self.left, self.right) {
            (Some(child), None) | (None, Some(child)) => Some(child),
            _ => None,
        }
    }
}
