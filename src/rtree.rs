use std::fmt;
use std::io;

use log::{debug, trace};

use crate::bound::{Bound, Bounded};
use crate::config::Config;
use crate::error::Result;
use crate::interval::FlightInterval;
use crate::iter::{Iter, SearchIter};
use crate::node::{Node, NodeKind};

/// A one-dimensional R-tree of flight intervals, answering which flights are airborne at a
/// given time.
#[derive(Debug)]
pub struct FlightRTree {
    /// Root of the tree
    pub(crate) root: Node,
    /// Fanout settings
    pub(crate) config: Config,
    /// Number of records in the tree
    pub(crate) len: usize,
}

impl FlightRTree {
    /// Create an empty `FlightRTree` with the reference fanout of 2
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty `FlightRTree` with the given configuration
    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        FlightRTree {
            root: Node::new_leaf(),
            config,
            len: 0,
        }
    }

    /// Insert a flight into the tree.
    ///
    /// Non-finite coordinates or end and negative spans are rejected and leave the tree
    /// unchanged.
    /// Identical records are all kept.
    ///
    /// # Example
    /// ```rust
    /// use flight_rtree::FlightRTree;
    ///
    /// let mut tree = FlightRTree::new();
    /// tree.insert("AA1", 100.0, 50.0).unwrap();
    /// tree.insert("BB2", 200.0, 30.0).unwrap();
    /// assert!(tree.insert("CC3", 50.0, -10.0).is_err());
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[inline]
    pub fn insert(&mut self, id: impl Into<String>, start: f64, span: f64) -> Result<()> {
        let record = FlightInterval::try_new(id, start, span)?;
        self.insert_valid(record);
        Ok(())
    }

    /// Insert a record, checking it again since its fields may have changed after creation.
    pub fn insert_record(&mut self, record: FlightInterval) -> Result<()> {
        record.validate()?;
        self.insert_valid(record);
        Ok(())
    }

    fn insert_valid(&mut self, record: FlightInterval) {
        let max_entries = self.config.max_entries();
        if let Some(sibling) = Self::insert_inner(&mut self.root, record, max_entries) {
            let old_root = std::mem::replace(&mut self.root, Node::new_leaf());
            self.root = Node::new_internal(vec![old_root, sibling]);
            trace!("root split, tree height is now {}", self.height());
        }
        self.len = self.len.wrapping_add(1);
    }

    /// Find every flight airborne at `at`, in depth-first discovery order.
    ///
    /// # Example
    /// ```rust
    /// use flight_rtree::FlightRTree;
    ///
    /// let mut tree = FlightRTree::new();
    /// tree.insert("AA1", 100.0, 50.0).unwrap();
    /// tree.insert("BB2", 200.0, 30.0).unwrap();
    /// tree.insert("CC3", 50.0, 10.0).unwrap();
    /// let ids: Vec<_> = tree.search(55.0).iter().map(|f| f.id.as_str()).collect();
    /// assert_eq!(ids, vec!["CC3"]);
    /// assert!(tree.search(1000.0).is_empty());
    /// ```
    #[inline]
    pub fn search(&self, at: f64) -> Vec<&FlightInterval> {
        self.search_iter(at).collect()
    }

    /// Lazily find every flight airborne at `at`.
    #[inline]
    #[must_use]
    pub fn search_iter(&self, at: f64) -> SearchIter<'_> {
        if !self.root.bound.contains(at) {
            debug!(
                "none found: {at} is outside [{}, {}]",
                self.root.bound.low(),
                self.root.bound.high()
            );
        }
        SearchIter::new(&self.root, at)
    }

    /// Write the tree structure to `out`, one line per node and per record.
    ///
    /// # Example
    /// ```rust
    /// use flight_rtree::FlightRTree;
    ///
    /// let mut tree = FlightRTree::new();
    /// tree.insert("AA1", 100.0, 50.0).unwrap();
    /// let mut out = Vec::new();
    /// tree.traverse(&mut out).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "Flight R Tree Traversal:\nNode: [100, 150]\nFlight: AA1 [100, 150]\n"
    /// );
    /// ```
    pub fn traverse<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Get an iterator over every record, leftmost leaf first.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root)
    }

    /// Bounding range of all records, empty for an empty tree
    #[inline]
    #[must_use]
    pub fn bound(&self) -> Bound {
        self.root.bound
    }

    /// Root node of the tree
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Number of levels, 1 for a tree that is a single leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut x = &self.root;
        while let NodeKind::Internal(children) = &x.kind {
            match children.first() {
                Some(child) => x = child,
                None => break,
            }
            height += 1;
        }
        height
    }

    /// Remove all records from the tree
    #[inline]
    pub fn clear(&mut self) {
        self.root = Node::new_leaf();
        self.len = 0;
    }

    /// Return the number of records in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FlightRTree {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl FlightRTree {
    /// Insert `record` beneath `node`, returning the new sibling if `node` had to split.
    fn insert_inner(node: &mut Node, record: FlightInterval, max_entries: usize) -> Option<Node> {
        let grown = match &mut node.kind {
            NodeKind::Leaf(entries) => {
                let grown = record.bound();
                entries.push(record);
                grown
            }
            NodeKind::Internal(children) => {
                let best = Self::choose_best_child(children, &record);
                let child = &mut children[best];
                let split = Self::insert_inner(child, record, max_entries);
                let mut grown = child.bound;
                if let Some(sibling) = split {
                    // the record may have landed in either half
                    grown.extend(sibling.bound);
                    children.push(sibling);
                }
                grown
            }
        };
        node.extend(&grown);
        (node.len() > max_entries).then(|| node.split())
    }

    /// Index of the child whose bound grows least to cover `record`; the first one wins ties.
    fn choose_best_child(children: &[Node], record: &FlightInterval) -> usize {
        let mut best = 0;
        let mut min_enlargement = f64::INFINITY;
        for (i, child) in children.iter().enumerate() {
            let enlargement = child.bound.enlargement(record);
            if enlargement < min_enlargement {
                min_enlargement = enlargement;
                best = i;
            }
        }
        best
    }

    fn fmt_node(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(
            f,
            "{indent}Node: [{}, {}]",
            node.bound.low(),
            node.bound.high()
        )?;
        match &node.kind {
            NodeKind::Leaf(entries) => {
                for entry in entries {
                    writeln!(
                        f,
                        "{indent}Flight: {} [{}, {}]",
                        entry.id,
                        entry.start,
                        entry.end()
                    )?;
                }
            }
            NodeKind::Internal(children) => {
                for child in children {
                    Self::fmt_node(child, depth + 1, f)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for FlightRTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flight R Tree Traversal:")?;
        Self::fmt_node(&self.root, 0, f)
    }
}

#[cfg(feature = "graphviz")]
impl FlightRTree {
    /// Write the tree to `filename` in graphviz DOT format.
    pub fn draw(&self, filename: &str) -> io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(filename)?;
        writeln!(file, "digraph {{")?;
        let mut next_id = 0;
        Self::draw_node(&self.root, &mut next_id, &mut file)?;
        writeln!(file, "}}")
    }

    /// Write `node` and its subtree, returning the DOT id of `node`.
    fn draw_node<W: io::Write>(node: &Node, next_id: &mut usize, out: &mut W) -> io::Result<usize> {
        let id = *next_id;
        *next_id += 1;
        let mut label = format!("[{}, {}]", node.bound.low(), node.bound.high());
        match &node.kind {
            NodeKind::Leaf(entries) => {
                for entry in entries {
                    let flight = entry.id.replace('"', "\\\"");
                    label.push_str(&format!("\\n{flight} [{}, {}]", entry.start, entry.end()));
                }
                writeln!(out, "    n{id} [shape=box, label=\"{label}\"];")?;
            }
            NodeKind::Internal(children) => {
                writeln!(out, "    n{id} [label=\"{label}\"];")?;
                for child in children {
                    let child_id = Self::draw_node(child, next_id, out)?;
                    writeln!(out, "    n{id} -> n{child_id};")?;
                }
            }
        }
        Ok(id)
    }
}
