use rand::{rngs::StdRng, Rng, SeedableRng};

use super::*;
use crate::bound::Bounded;

struct FlightGenerator {
    rng: StdRng,
    limit: f64,
    next_id: usize,
}

impl FlightGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: f64 = 1000.0;
        Self {
            rng: SeedableRng::from_seed(seed),
            limit: LIMIT,
            next_id: 0,
        }
    }

    fn next(&mut self) -> FlightInterval {
        let start = self.rng.gen_range(0.0..self.limit);
        let span = self.rng.gen_range(0.0..self.limit / 10.0);
        self.next_id += 1;
        FlightInterval::new(format!("FL{}", self.next_id), start, span)
    }

    fn next_time(&mut self) -> f64 {
        self.rng.gen_range(-10.0..self.limit * 1.2)
    }
}

/// Sortable identity of a record, so multisets of records can be compared.
fn key(f: &FlightInterval) -> (String, u64, u64) {
    (f.id.clone(), f.start.to_bits(), f.span.to_bits())
}

impl FlightRTree {
    /// Every node bound is the tightest range covering its subtree and no node is overfull.
    fn check_invariants(&self) {
        let _ignore = self.check_node(&self.root, true);
    }

    fn check_node(&self, x: &Node, is_root: bool) -> Bound {
        let max = self.config.max_entries();
        assert!(x.len() <= max, "node holds {} > {max}", x.len());
        let mut expect = Bound::EMPTY;
        match &x.kind {
            NodeKind::Leaf(entries) => {
                assert!(is_root || !entries.is_empty(), "empty leaf below the root");
                for e in entries {
                    expect.extend(e.bound());
                }
            }
            NodeKind::Internal(children) => {
                assert!(!children.is_empty(), "internal node without children");
                for c in children {
                    expect.extend(self.check_node(c, false));
                }
            }
        }
        assert_eq!(x.bound(), expect, "stale bound");
        expect
    }

    /// Every leaf sits at the same depth.
    fn check_leaf_depth(&self) {
        fn depths(x: &Node, depth: usize, out: &mut Vec<usize>) {
            match x.children() {
                None => out.push(depth),
                Some(children) => children.iter().for_each(|c| depths(c, depth + 1, out)),
            }
        }
        let mut out = vec![];
        depths(&self.root, 1, &mut out);
        assert!(out.iter().all(|&d| d == self.height()));
    }

    fn count_nodes(&self) -> usize {
        fn count(x: &Node) -> usize {
            1 + x.children().map_or(0, |cs| cs.iter().map(count).sum())
        }
        count(&self.root)
    }
}

fn with_tree_and_generator(test_fn: impl Fn(FlightRTree, FlightGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for max_entries in [2, 3, 8] {
        for seed in &seeds {
            let gen = FlightGenerator::new(*seed);
            let tree = FlightRTree::with_config(Config::new(max_entries).unwrap());
            test_fn(tree, gen);
        }
    }
}

fn ids(found: &[&FlightInterval]) -> Vec<String> {
    found.iter().map(|f| f.id.clone()).collect()
}

#[test]
fn three_insertions_force_one_split() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 100.0, 50.0).unwrap();
    tree.insert("BB2", 200.0, 30.0).unwrap();
    assert_eq!(tree.height(), 1);
    tree.insert("CC3", 50.0, 10.0).unwrap();
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.root().len(), 2);
    tree.check_invariants();

    assert_eq!(ids(&tree.search(55.0)), vec!["CC3"]);
    assert_eq!(ids(&tree.search(120.0)), vec!["AA1"]);
    assert!(tree.search(1000.0).is_empty());
}

#[test]
fn containment_is_closed_at_both_ends() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 100.0, 50.0).unwrap();
    assert_eq!(ids(&tree.search(100.0)), vec!["AA1"]);
    assert_eq!(ids(&tree.search(150.0)), vec!["AA1"]);
    assert!(tree.search(99.999).is_empty());
    assert!(tree.search(150.001).is_empty());
}

#[test]
fn query_outside_root_bound_visits_nothing() {
    with_tree_and_generator(|mut tree, mut gen| {
        for _ in 0..200 {
            tree.insert_record(gen.next()).unwrap();
        }
        let bound = tree.bound();
        for at in [bound.low() - 1.0, bound.high() + 1.0, -1e9, 1e9] {
            let mut iter = tree.search_iter(at);
            assert!(iter.next().is_none());
            assert_eq!(iter.visited, 0);
        }
    });
}

#[test]
fn search_prunes_disjoint_subtrees() {
    let mut tree = FlightRTree::new();
    for i in 0..64_u32 {
        tree.insert(format!("FL{i}"), f64::from(i) * 10.0, 5.0).unwrap();
    }
    tree.check_invariants();
    let total = tree.count_nodes();
    for i in 0..64_u32 {
        let mut iter = tree.search_iter(f64::from(i) * 10.0 + 2.5);
        let found: Vec<_> = iter.by_ref().map(|f| f.id.clone()).collect();
        assert_eq!(found, vec![format!("FL{i}")]);
        assert!(iter.visited <= tree.height());
        assert!(iter.visited < total);
    }
}

#[test]
fn invariants_hold_after_every_insert() {
    with_tree_and_generator(|mut tree, mut gen| {
        for _ in 0..300 {
            tree.insert_record(gen.next()).unwrap();
            tree.check_invariants();
        }
        tree.check_leaf_depth();
    });
}

#[test]
fn records_are_conserved() {
    with_tree_and_generator(|mut tree, mut gen| {
        let flights: Vec<_> = std::iter::repeat_with(|| gen.next()).take(500).collect();
        for f in flights.clone() {
            tree.insert_record(f).unwrap();
        }
        assert_eq!(tree.len(), 500);
        assert_eq!(tree.iter().count(), 500);

        let mut expect: Vec<_> = flights.iter().map(key).collect();
        let mut actual: Vec<_> = tree.iter().map(key).collect();
        expect.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expect, actual);
    });
}

#[test]
fn search_matches_brute_force() {
    with_tree_and_generator(|mut tree, mut gen| {
        let flights: Vec<_> = std::iter::repeat_with(|| gen.next()).take(500).collect();
        for f in flights.clone() {
            tree.insert_record(f).unwrap();
        }
        let times: Vec<_> = std::iter::repeat_with(|| gen.next_time())
            .take(500)
            .chain(flights.iter().flat_map(|f| [f.start, f.end()]))
            .collect();
        for at in times {
            let mut expect: Vec<_> = flights.iter().filter(|f| f.contains(at)).map(key).collect();
            let mut result: Vec<_> = tree.search(at).into_iter().map(key).collect();
            expect.sort_unstable();
            result.sort_unstable();
            assert_eq!(expect, result, "query at {at}");
        }
    });
}

#[test]
fn search_order_is_leftmost_first() {
    with_tree_and_generator(|mut tree, mut gen| {
        for _ in 0..200 {
            tree.insert_record(gen.next()).unwrap();
        }
        for _ in 0..100 {
            let at = gen.next_time();
            let searched: Vec<_> = tree.search(at).into_iter().map(key).collect();
            let scanned: Vec<_> = tree.iter().filter(|f| f.contains(at)).map(key).collect();
            assert_eq!(searched, scanned);
        }
    });
}

#[test]
fn duplicates_are_all_kept() {
    let mut tree = FlightRTree::new();
    for _ in 0..3 {
        tree.insert("DUP", 10.0, 5.0).unwrap();
    }
    tree.insert("OTHER", 12.0, 1.0).unwrap();
    tree.check_invariants();
    assert_eq!(tree.len(), 4);
    let mut found = ids(&tree.search(12.5));
    found.sort_unstable();
    assert_eq!(found, vec!["DUP", "DUP", "DUP", "OTHER"]);
}

#[test]
fn rejected_insert_leaves_tree_unchanged() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 100.0, 50.0).unwrap();
    let before = tree.bound();
    assert!(matches!(
        tree.insert("BAD", 0.0, -10.0),
        Err(Error::InvalidInterval { .. })
    ));
    assert!(tree.insert("NAN", f64::NAN, 1.0).is_err());
    assert!(tree.insert("HUGE", f64::MAX, f64::MAX).is_err());

    let mut edited = FlightInterval::new("EDIT", 10.0, 5.0);
    edited.span = -5.0;
    assert!(matches!(
        tree.insert_record(edited),
        Err(Error::InvalidInterval { .. })
    ));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.bound(), before);
    assert_eq!(tree.iter().count(), 1);
}

#[test]
fn empty_tree_finds_nothing() {
    let tree = FlightRTree::new();
    assert!(tree.is_empty());
    assert!(tree.bound().is_empty());
    assert_eq!(tree.height(), 1);
    assert!(tree.search(0.0).is_empty());
    assert_eq!(tree.iter().count(), 0);
}

#[test]
fn traverse_prints_every_node_once() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 100.0, 50.0).unwrap();
    tree.insert("BB2", 200.0, 30.0).unwrap();
    tree.insert("CC3", 50.0, 10.0).unwrap();

    let mut out = Vec::new();
    tree.traverse(&mut out).unwrap();
    let expect = "\
Flight R Tree Traversal:
Node: [50, 230]
  Node: [50, 60]
  Flight: CC3 [50, 60]
  Node: [100, 230]
  Flight: AA1 [100, 150]
  Flight: BB2 [200, 230]
";
    assert_eq!(String::from_utf8(out).unwrap(), expect);
}

#[test]
fn traverse_counts_match_tree() {
    with_tree_and_generator(|mut tree, mut gen| {
        for _ in 0..100 {
            tree.insert_record(gen.next()).unwrap();
        }
        let dump = tree.to_string();
        let nodes = dump.lines().filter(|l| l.trim_start().starts_with("Node:")).count();
        let flights = dump.lines().filter(|l| l.trim_start().starts_with("Flight:")).count();
        assert_eq!(nodes, tree.count_nodes());
        assert_eq!(flights, 100);
    });
}

#[test]
fn flight_rtree_clear_is_ok() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 1.0, 2.0).unwrap();
    tree.insert("BB2", 2.0, 2.0).unwrap();
    tree.insert("CC3", 6.0, 1.0).unwrap();
    assert_eq!(tree.len(), 3);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert!(tree.root().is_leaf());
    assert!(tree.bound().is_empty());
}

#[cfg(feature = "graphviz")]
#[test]
fn flight_rtree_draw_is_ok() {
    let mut tree = FlightRTree::new();
    tree.insert("AA1", 100.0, 50.0).unwrap();
    tree.insert("BB2", 200.0, 30.0).unwrap();
    tree.insert("CC3", 50.0, 10.0).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flights.dot");
    assert!(tree.draw(path.to_str().unwrap()).is_ok());
    let dot = std::fs::read_to_string(&path).unwrap();
    assert!(dot.starts_with("digraph {"));
    assert_eq!(dot.matches("->").count(), 2);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_flight_interval() {
    use serde_json::{json, Value};

    let flight = FlightInterval::new("AA1", 100.0, 50.0);
    let serialized = serde_json::to_string(&flight).unwrap();
    let actual: Value = serde_json::from_str(&serialized).unwrap();
    assert_eq!(actual, json!({"id": "AA1", "start": 100.0, "span": 50.0}));

    let deserialized: FlightInterval = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, flight);

    let config: Config = serde_json::from_str(r#"{"max_entries": 4}"#).unwrap();
    assert_eq!(config.max_entries(), 4);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_config_rejects_small_fanout() {
    assert!(serde_json::from_str::<Config>(r#"{"max_entries": 1}"#).is_err());
    assert!(serde_json::from_str::<Config>(r#"{"max_entries": 0}"#).is_err());

    let config: Config = serde_json::from_str(r#"{"max_entries": 2}"#).unwrap();
    let mut tree = FlightRTree::with_config(config);
    for i in 0..10_u32 {
        tree.insert(format!("FL{i}"), f64::from(i), 1.0).unwrap();
    }
    tree.check_invariants();
    assert_eq!(
        serde_json::to_string(&config).unwrap(),
        r#"{"max_entries":2}"#
    );
}

mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// Search returns exactly the flights a linear scan finds.
        #[test]
        fn prop_search_matches_brute_force(
            flights in prop::collection::vec((0.0..1000.0f64, 0.0..100.0f64), 0..200),
            times in prop::collection::vec(-10.0..1110.0f64, 1..20),
            max_entries in 2usize..6,
        ) {
            let mut tree = FlightRTree::with_config(Config::new(max_entries).unwrap());
            let flights: Vec<_> = flights
                .into_iter()
                .enumerate()
                .map(|(i, (start, span))| FlightInterval::new(format!("FL{i}"), start, span))
                .collect();
            for f in flights.clone() {
                tree.insert_record(f).unwrap();
            }
            tree.check_invariants();
            prop_assert_eq!(tree.len(), flights.len());

            for at in times {
                let mut expect: Vec<_> = flights.iter().filter(|f| f.contains(at)).map(key).collect();
                let mut result: Vec<_> = tree.search(at).into_iter().map(key).collect();
                expect.sort_unstable();
                result.sort_unstable();
                prop_assert_eq!(expect, result);
            }
        }
    }
}
