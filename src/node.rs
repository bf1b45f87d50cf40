use crate::bound::{Bound, Bounded};
use crate::interval::FlightInterval;

/// Node of the R-tree
#[derive(Debug)]
pub struct Node {
    /// Bounding range of everything beneath the node
    pub(crate) bound: Bound,
    /// Entries or children
    pub(crate) kind: NodeKind,
}

/// The content of a node. A node never holds both entries and children.
#[derive(Debug)]
pub enum NodeKind {
    /// Leaf node holding flight records
    Leaf(Vec<FlightInterval>),
    /// Internal node owning its children
    Internal(Vec<Node>),
}

impl Bounded for Node {
    #[inline]
    fn bound(&self) -> Bound {
        self.bound
    }
}

impl Node {
    /// Create an empty leaf
    pub fn new_leaf() -> Self {
        Node {
            bound: Bound::EMPTY,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    /// Create an internal node owning `children`, bounded tightly around them
    pub fn new_internal(children: Vec<Node>) -> Self {
        let mut node = Node {
            bound: Bound::EMPTY,
            kind: NodeKind::Internal(children),
        };
        node.recompute();
        node
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Number of entries of a leaf or children of an internal node
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Option<&[FlightInterval]> {
        match &self.kind {
            NodeKind::Leaf(entries) => Some(entries),
            NodeKind::Internal(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal(children) => Some(children),
        }
    }

    /// Widen the bound to cover a record or a child.
    pub(crate) fn extend<B: Bounded>(&mut self, item: &B) {
        self.bound.extend(item.bound());
    }

    /// Reset the bound and rebuild it from the current entries or children.
    pub(crate) fn recompute(&mut self) {
        self.bound = match &self.kind {
            NodeKind::Leaf(entries) => Bound::covering(entries),
            NodeKind::Internal(children) => Bound::covering(children),
        };
    }

    /// Split the node by sort order.
    ///
    /// Entries are ordered by start, children by bound low. The node keeps the lower half
    /// `[0, n/2)` and the returned sibling, of the same kind, gets `[n/2, n)`.
    pub(crate) fn split(&mut self) -> Node {
        let kind = match &mut self.kind {
            NodeKind::Leaf(entries) => {
                entries.sort_by(|a, b| a.start.total_cmp(&b.start));
                let mid = entries.len() / 2;
                NodeKind::Leaf(entries.split_off(mid))
            }
            NodeKind::Internal(children) => {
                children.sort_by(|a, b| a.bound.low().total_cmp(&b.bound.low()));
                let mid = children.len() / 2;
                NodeKind::Internal(children.split_off(mid))
            }
        };
        self.recompute();
        let mut sibling = Node {
            bound: Bound::EMPTY,
            kind,
        };
        sibling.recompute();
        sibling
    }
}
