//! Visible node/edge derivation.
//!
//! Runs in three passes over the store, from scratch on every call:
//!
//! 1. base-visible nodes: manually included and at or above every node
//!    threshold;
//! 2. visible edges: weight at or above the edge threshold with both
//!    endpoints base-visible, marking the endpoints as they pass;
//! 3. visible nodes: all base-visible nodes when isolates are shown,
//!    otherwise only the marked ones.
//!
//! A node failing a node filter can never be brought back by its edges.

use std::collections::HashSet;

use log::debug;

use super::filter::FilterState;
use super::store::{EdgeId, GraphStore, Node, NodeId};

/// Visible node and edge ids for one (store, filter) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
	/// Visible node ids.
	pub nodes: HashSet<NodeId>,
	/// Visible edge ids.
	pub edges: HashSet<EdgeId>,
}

impl Visibility {
	/// Whether node `id` is visible.
	pub fn is_node_visible(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	/// Whether edge `id` is visible.
	pub fn is_edge_visible(&self, id: &str) -> bool {
		self.edges.contains(id)
	}
}

fn passes_node_filters(node: &Node, filter: &FilterState) -> bool {
	let m = &node.metrics;
	filter.is_manually_visible(&node.id)
		&& m.degree as f64 >= filter.degree_threshold()
		&& m.weighted_degree >= filter.weighted_degree_threshold()
		&& m.betweenness >= filter.betweenness_threshold()
}

/// Nodes passing manual inclusion and the three node thresholds, before any
/// isolate filtering.
pub fn base_visible<'a>(store: &'a GraphStore, filter: &FilterState) -> HashSet<&'a str> {
	store
		.nodes()
		.filter(|node| passes_node_filters(node, filter))
		.map(|node| node.id.as_str())
		.collect()
}

/// Computes the visible sets. Never fails: degenerate filters give empty
/// sets.
pub fn resolve(store: &GraphStore, filter: &FilterState) -> Visibility {
	let base = base_visible(store, filter);
	let threshold = filter.edge_weight_threshold();

	let mut touched = HashSet::new();
	let mut edges = HashSet::new();
	for edge in store.edges() {
		if edge.weight < threshold {
			continue;
		}
		if !base.contains(edge.source.as_str()) || !base.contains(edge.target.as_str()) {
			continue;
		}
		touched.insert(edge.source.as_str());
		touched.insert(edge.target.as_str());
		edges.insert(edge.id.clone());
	}

	let nodes: HashSet<NodeId> = if filter.show_isolates() {
		base.into_iter().map(str::to_owned).collect()
	} else {
		touched.into_iter().map(str::to_owned).collect()
	};

	debug!(
		"visibility resolved: {}/{} nodes, {}/{} edges",
		nodes.len(),
		store.node_count(),
		edges.len(),
		store.edge_count()
	);
	Visibility { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::filter::MetricRanges;
	use crate::graph::store::{EdgeRecord, GraphKind, NodeRecord};

	fn set<const N: usize>(ids: [&str; N]) -> HashSet<String> {
		ids.into_iter().map(String::from).collect()
	}

	fn node(id: &str) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			..Default::default()
		}
	}

	fn edge(id: &str, source: &str, target: &str, weight: f64) -> EdgeRecord {
		EdgeRecord {
			id: Some(id.into()),
			source: source.into(),
			target: target.into(),
			weight: Some(weight),
			..Default::default()
		}
	}

	/// A-B (0.5), B-C (0.9), node thresholds at zero.
	fn abc() -> (GraphStore, FilterState) {
		let store = GraphStore::load(
			GraphKind::Undirected,
			[node("A"), node("B"), node("C")],
			[edge("AB", "A", "B", 0.5), edge("BC", "B", "C", 0.9)],
		);
		let mut ranges = MetricRanges::observed(&store);
		ranges.degree.min = 0.0;
		ranges.weighted_degree.min = 0.0;
		let filter = FilterState::new(&store, ranges);
		(store, filter)
	}

	#[test]
	fn defaults_show_everything() {
		let (store, filter) = abc();
		let vis = resolve(&store, &filter);
		assert_eq!(vis.nodes, set(["A", "B", "C"]));
		assert_eq!(vis.edges, set(["AB", "BC"]));
	}

	#[test]
	fn edge_threshold_keeps_isolates_when_shown() {
		let (store, mut filter) = abc();
		filter.set_edge_weight_threshold(0.6);
		let vis = resolve(&store, &filter);
		assert_eq!(vis.nodes, set(["A", "B", "C"]));
		assert_eq!(vis.edges, set(["BC"]));
	}

	#[test]
	fn hiding_isolates_drops_nodes_that_lost_their_edges() {
		let (store, mut filter) = abc();
		filter.set_edge_weight_threshold(0.6);
		filter.set_show_isolates(false);
		let vis = resolve(&store, &filter);
		assert_eq!(vis.nodes, set(["B", "C"]));
		assert_eq!(vis.edges, set(["BC"]));
	}

	#[test]
	fn manual_exclusion_hides_node_and_its_edges() {
		let (store, mut filter) = abc();
		filter.set_manual_visible("A", false);
		let vis = resolve(&store, &filter);
		assert!(!vis.is_node_visible("A"));
		assert!(!vis.is_edge_visible("AB"));
		assert!(vis.is_edge_visible("BC"));
	}

	#[test]
	fn select_none_then_invert_restores_base_set() {
		let (store, mut filter) = abc();
		filter.select_none();
		assert!(base_visible(&store, &filter).is_empty());
		filter.invert_selection();
		let base = base_visible(&store, &filter);
		assert_eq!(base.len(), store.node_count());
	}

	#[test]
	fn node_threshold_removes_edges_even_if_heavy() {
		let (store, mut filter) = abc();
		// A and C have degree 1, B has degree 2
		filter.set_degree_threshold(2.0);
		let vis = resolve(&store, &filter);
		assert_eq!(vis.nodes, set(["B"]));
		assert!(vis.edges.is_empty());
	}

	#[test]
	fn thresholds_above_every_value_give_empty_sets() {
		let (store, mut filter) = abc();
		filter.set_betweenness_threshold(1e9);
		assert_eq!(resolve(&store, &filter), Visibility::default());
	}

	#[test]
	fn single_edge_node_cascades_out() {
		let (store, mut filter) = abc();
		filter.set_edge_weight_threshold(0.95);
		filter.set_show_isolates(false);
		let vis = resolve(&store, &filter);
		assert!(vis.nodes.is_empty());
		assert!(vis.edges.is_empty());
		filter.set_show_isolates(true);
		assert_eq!(resolve(&store, &filter).nodes.len(), 3);
	}

	#[test]
	fn repeated_resolution_is_identical() {
		let (store, mut filter) = abc();
		filter.set_edge_weight_threshold(0.6);
		assert_eq!(resolve(&store, &filter), resolve(&store, &filter));
	}
}
