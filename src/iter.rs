use std::slice;

use crate::interval::FlightInterval;
use crate::node::{Node, NodeKind};

/// An iterator over every record of a `FlightRTree`, leftmost leaf first.
#[derive(Debug)]
pub struct Iter<'a> {
    /// Nodes still to be visited, next on top
    pub(crate) stack: Vec<&'a Node>,
    /// Entries of the leaf being drained
    pub(crate) entries: slice::Iter<'a, FlightInterval>,
}

impl<'a> Iter<'a> {
    pub fn new(root: &'a Node) -> Self {
        Iter {
            stack: vec![root],
            entries: Default::default(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FlightInterval;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.entries.next() {
                return Some(entry);
            }
            match &self.stack.pop()?.kind {
                NodeKind::Leaf(entries) => self.entries = entries.iter(),
                NodeKind::Internal(children) => self.stack.extend(children.iter().rev()),
            }
        }
    }
}

/// A point query iterator over a `FlightRTree`. It yields the records airborne at the query
/// time and only descends into children whose bound contains it.
///
/// The records come in the same order as `FlightRTree::search` returns them.
#[derive(Debug)]
pub struct SearchIter<'a> {
    /// Nodes still to be visited, next on top
    pub(crate) stack: Vec<&'a Node>,
    /// Entries of the leaf being scanned
    pub(crate) entries: slice::Iter<'a, FlightInterval>,
    /// Query time
    pub(crate) at: f64,
    /// Number of nodes visited so far
    pub(crate) visited: usize,
}

impl<'a> SearchIter<'a> {
    pub fn new(root: &'a Node, at: f64) -> Self {
        let stack = if root.bound.contains(at) {
            vec![root]
        } else {
            vec![]
        };
        SearchIter {
            stack,
            entries: Default::default(),
            at,
            visited: 0,
        }
    }
}

impl<'a> Iterator for SearchIter<'a> {
    type Item = &'a FlightInterval;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let at = self.at;
        loop {
            if let Some(entry) = self.entries.find(|e| e.contains(at)) {
                return Some(entry);
            }
            let node = self.stack.pop()?;
            self.visited += 1;
            match &node.kind {
                NodeKind::Leaf(entries) => self.entries = entries.iter(),
                NodeKind::Internal(children) => self
                    .stack
                    .extend(children.iter().rev().filter(|c| c.bound.contains(at))),
            }
        }
    }
}
