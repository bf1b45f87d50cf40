//! `flight_rtree` is a one-dimensional R-tree over flight intervals.
//!
//! Every flight spans `[start, start + span]`. Flights are grouped into leaves, leaves into
//! internal nodes, and every node keeps the tightest bounding range of everything beneath it.
//! A point query only descends into nodes whose bounding range contains the query time, so
//! "which flights were airborne at time T" does not scan the whole data set.
//!
//! Nodes hold at most `Config::max_entries` entries or children (2 by default). An overfull
//! node is split by sort order into two halves, and the root grows a level when it splits.
//!
//! # Example
//!
//! ```rust
//! use flight_rtree::FlightRTree;
//!
//! let mut tree = FlightRTree::new();
//! tree.insert("AA1", 100.0, 50.0).unwrap();
//! tree.insert("BB2", 200.0, 30.0).unwrap();
//! tree.insert("CC3", 50.0, 10.0).unwrap();
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.search(120.0)[0].id, "AA1");
//! assert!(tree.search(1000.0).is_empty());
//! ```
//!

mod bound;
mod config;
mod error;
mod interval;
mod iter;
pub mod loader;
mod node;
mod rtree;

#[cfg(test)]
mod tests;

pub use bound::Bound;
pub use config::{Config, DEFAULT_MAX_ENTRIES, MIN_MAX_ENTRIES};
pub use error::{Error, Result};
pub use interval::FlightInterval;
pub use iter::{Iter, SearchIter};
pub use loader::{LoadPolicy, LoadSummary};
pub use node::{Node, NodeKind};
pub use rtree::FlightRTree;
