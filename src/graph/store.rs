//! Immutable node/edge storage for one loaded graph.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use super::attrs::AttrBag;

/// Node identity. Integer ids in source data are stringified.
pub type NodeId = String;
/// Edge identity, unique within a store.
pub type EdgeId = String;

/// Fallback visual size for nodes without one.
pub const DEFAULT_NODE_SIZE: f64 = 4.0;
/// Fallback color for nodes without one.
pub const DEFAULT_NODE_COLOR: &str = "#94a3b8";
/// Fallback stroke width for edges.
pub const DEFAULT_EDGE_SIZE: f64 = 1.0;
/// Fallback stroke color for edges.
pub const DEFAULT_EDGE_COLOR: &str = "rgba(255,255,255,0.14)";

/// Directedness of the loaded graph, fixed for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphKind {
	/// Edges point from source to target.
	Directed,
	/// Edges connect an unordered pair.
	#[default]
	Undirected,
}

impl GraphKind {
	/// Reads a source `type`/`defaultedgetype` value; anything but
	/// `directed` is undirected.
	pub fn parse(raw: &str) -> Self {
		if raw.trim().eq_ignore_ascii_case("directed") {
			GraphKind::Directed
		} else {
			GraphKind::Undirected
		}
	}
}

/// Precomputed per-node metrics used by the threshold filters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeMetrics {
	/// Incident edge count.
	pub degree: u32,
	/// Sum of incident edge weights.
	pub weighted_degree: f64,
	/// Externally supplied betweenness centrality.
	pub betweenness: f64,
}

/// A loaded node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique id.
	pub id: NodeId,
	/// Display label.
	pub label: String,
	/// Precomputed position; `None` means the layout places it.
	pub position: Option<(f64, f64)>,
	/// Visual size.
	pub size: f64,
	/// CSS color.
	pub color: String,
	/// Filterable metrics.
	pub metrics: NodeMetrics,
	/// Remaining source attributes.
	pub attrs: AttrBag,
}

/// A loaded edge whose endpoints are both present in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Unique key.
	pub id: EdgeId,
	/// Source node id.
	pub source: NodeId,
	/// Target node id.
	pub target: NodeId,
	/// Edge weight, 1 when the source value was missing or invalid.
	pub weight: f64,
	/// Stroke width.
	pub size: f64,
	/// CSS color.
	pub color: String,
	/// Remaining source attributes.
	pub attrs: AttrBag,
}

impl Edge {
	/// Whether `node` is one of this edge's endpoints.
	pub fn touches(&self, node: &str) -> bool {
		self.source == node || self.target == node
	}
}

/// Node as read from a dataset, before validation and metric derivation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeRecord {
	/// Id.
	pub id: NodeId,
	/// Label, defaults to the id.
	pub label: Option<String>,
	/// Precomputed position.
	pub position: Option<(f64, f64)>,
	/// Visual size.
	pub size: Option<f64>,
	/// CSS color.
	pub color: Option<String>,
	/// Supplied degree; derived from edges when absent.
	pub degree: Option<f64>,
	/// Supplied weighted degree; derived from edges when absent.
	pub weighted_degree: Option<f64>,
	/// Supplied betweenness; 0 when absent.
	pub betweenness: Option<f64>,
	/// Attribute bag.
	pub attrs: AttrBag,
}

/// Edge as read from a dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeRecord {
	/// Key; generated when absent.
	pub id: Option<EdgeId>,
	/// Source node id.
	pub source: NodeId,
	/// Target node id.
	pub target: NodeId,
	/// Weight; 1 when absent or non-finite.
	pub weight: Option<f64>,
	/// Stroke width.
	pub size: Option<f64>,
	/// CSS color.
	pub color: Option<String>,
	/// Attribute bag.
	pub attrs: AttrBag,
}

/// The authoritative node/edge collection. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	kind: GraphKind,
	nodes: Vec<Node>,
	node_index: HashMap<NodeId, usize>,
	edges: Vec<Edge>,
	edge_index: HashMap<EdgeId, usize>,
	incidence: Vec<Vec<usize>>,
	dropped_edges: usize,
}

fn finite(value: Option<f64>) -> Option<f64> {
	value.filter(|v| v.is_finite())
}

fn metric(value: Option<f64>) -> Option<f64> {
	value.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
}

impl GraphStore {
	/// Builds a store. Edges with a missing endpoint are dropped, duplicate
	/// node ids keep their first occurrence, and duplicate edge keys are
	/// suffixed (`key~1`, `key~2`, ...).
	pub fn load(
		kind: GraphKind,
		nodes: impl IntoIterator<Item = NodeRecord>,
		edges: impl IntoIterator<Item = EdgeRecord>,
	) -> Self {
		let mut store = GraphStore {
			kind,
			..Default::default()
		};
		let mut supplied = Vec::new();

		for record in nodes {
			if store.node_index.contains_key(&record.id) {
				warn!("duplicate node id {:?} ignored", record.id);
				continue;
			}
			store.node_index.insert(record.id.clone(), store.nodes.len());
			supplied.push((metric(record.degree), metric(record.weighted_degree)));
			store.nodes.push(Node {
				label: record.label.unwrap_or_else(|| record.id.clone()),
				id: record.id,
				position: record
					.position
					.filter(|(x, y)| x.is_finite() && y.is_finite()),
				size: finite(record.size).unwrap_or(DEFAULT_NODE_SIZE),
				color: record
					.color
					.filter(|c| !c.is_empty())
					.unwrap_or_else(|| DEFAULT_NODE_COLOR.into()),
				metrics: NodeMetrics {
					betweenness: metric(record.betweenness).unwrap_or(0.0),
					..Default::default()
				},
				attrs: record.attrs,
			});
		}
		store.incidence = vec![Vec::new(); store.nodes.len()];

		let mut degree = vec![0u32; store.nodes.len()];
		let mut weighted = vec![0.0f64; store.nodes.len()];

		for record in edges {
			let (Some(&s), Some(&t)) = (
				store.node_index.get(&record.source),
				store.node_index.get(&record.target),
			) else {
				debug!(
					"dropping edge {:?} -> {:?}: endpoint not loaded",
					record.source, record.target
				);
				store.dropped_edges += 1;
				continue;
			};

			let key = record
				.id
				.unwrap_or_else(|| format!("e{}", store.edges.len()));
			let key = store.unique_edge_key(key);
			let weight = finite(record.weight).unwrap_or(1.0);
			let idx = store.edges.len();

			degree[s] += 1;
			degree[t] += 1;
			weighted[s] += weight;
			weighted[t] += weight;
			store.incidence[s].push(idx);
			if s != t {
				store.incidence[t].push(idx);
			}

			store.edge_index.insert(key.clone(), idx);
			store.edges.push(Edge {
				id: key,
				source: record.source,
				target: record.target,
				weight,
				size: finite(record.size).unwrap_or(DEFAULT_EDGE_SIZE),
				color: record
					.color
					.filter(|c| !c.is_empty())
					.unwrap_or_else(|| DEFAULT_EDGE_COLOR.into()),
				attrs: record.attrs,
			});
		}

		for (i, (deg, wdeg)) in supplied.into_iter().enumerate() {
			let metrics = &mut store.nodes[i].metrics;
			metrics.degree = deg.map(|d| d.round() as u32).unwrap_or(degree[i]);
			metrics.weighted_degree = wdeg.unwrap_or(weighted[i]);
		}

		info!(
			"graph loaded: {} nodes, {} edges ({} dangling dropped)",
			store.nodes.len(),
			store.edges.len(),
			store.dropped_edges
		);
		store
	}

	fn unique_edge_key(&self, key: EdgeId) -> EdgeId {
		if !self.edge_index.contains_key(&key) {
			return key;
		}
		let mut n = 1usize;
		loop {
			let candidate = format!("{key}~{n}");
			if !self.edge_index.contains_key(&candidate) {
				warn!("duplicate edge key {key:?} stored as {candidate:?}");
				return candidate;
			}
			n += 1;
		}
	}

	/// Directedness of the graph.
	pub fn kind(&self) -> GraphKind {
		self.kind
	}

	/// Number of stored nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of stored edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Edges rejected at load time for referencing a missing node.
	pub fn dropped_edges(&self) -> usize {
		self.dropped_edges
	}

	/// Looks up a node.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Looks up an edge.
	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	/// Nodes in load order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	/// Edges in load order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	/// Calls `f` for every node.
	pub fn for_each_node(&self, f: impl FnMut(&Node)) {
		self.nodes.iter().for_each(f);
	}

	/// Calls `f` for every edge.
	pub fn for_each_edge(&self, f: impl FnMut(&Edge)) {
		self.edges.iter().for_each(f);
	}

	/// Edges with `id` as an endpoint. Self-loops appear once.
	pub fn incident_edges(&self, id: &str) -> impl Iterator<Item = &Edge> {
		self.node_index
			.get(id)
			.map(|&i| self.incidence[i].as_slice())
			.unwrap_or_default()
			.iter()
			.map(|&e| &self.edges[e])
	}

	/// Nodes sharing an edge with `id`, in either direction, without repeats.
	pub fn neighbors_of(&self, id: &str) -> Vec<&Node> {
		let mut seen = HashSet::new();
		self.incident_edges(id)
			.filter_map(|edge| {
				let other = if edge.source == id {
					&edge.target
				} else {
					&edge.source
				};
				seen.insert(other.as_str()).then(|| self.node(other)).flatten()
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			..Default::default()
		}
	}

	fn edge(source: &str, target: &str, weight: f64) -> EdgeRecord {
		EdgeRecord {
			source: source.into(),
			target: target.into(),
			weight: Some(weight),
			..Default::default()
		}
	}

	#[test]
	fn dangling_edges_are_dropped_and_counted() {
		let store = GraphStore::load(
			GraphKind::Undirected,
			[node("a"), node("b")],
			[edge("a", "b", 1.0), edge("a", "ghost", 1.0), edge("nope", "b", 1.0)],
		);
		assert_eq!(store.edge_count(), 1);
		assert_eq!(store.dropped_edges(), 2);
		assert!(store.edges().all(|e| e.source != "ghost" && e.target != "ghost"));
	}

	#[test]
	fn generated_keys_count_accepted_edges() {
		let store = GraphStore::load(
			GraphKind::Undirected,
			[node("a"), node("b"), node("c")],
			[edge("a", "x", 1.0), edge("a", "b", 1.0), edge("b", "c", 1.0)],
		);
		let ids: Vec<_> = store.edges().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["e0", "e1"]);
	}

	#[test]
	fn duplicate_edge_keys_are_suffixed() {
		let keyed = |id: &str| EdgeRecord {
			id: Some(id.into()),
			..edge("a", "b", 1.0)
		};
		let store = GraphStore::load(
			GraphKind::Undirected,
			[node("a"), node("b")],
			[keyed("k"), keyed("k"), keyed("k")],
		);
		let ids: Vec<_> = store.edges().map(|e| e.id.clone()).collect();
		assert_eq!(ids, ["k", "k~1", "k~2"]);
		assert!(store.edge("k~2").is_some());
	}

	#[test]
	fn missing_metrics_are_derived_from_edges() {
		let store = GraphStore::load(
			GraphKind::Undirected,
			[node("a"), node("b"), node("c")],
			[edge("a", "b", 0.5), edge("b", "c", 0.25)],
		);
		let b = store.node("b").unwrap().metrics;
		assert_eq!(b.degree, 2);
		assert!((b.weighted_degree - 0.75).abs() < 1e-12);
		assert_eq!(b.betweenness, 0.0);
	}

	#[test]
	fn supplied_metrics_are_kept_verbatim() {
		let a = NodeRecord {
			degree: Some(7.0),
			weighted_degree: Some(3.5),
			betweenness: Some(0.12),
			..node("a")
		};
		let store = GraphStore::load(GraphKind::Undirected, [a, node("b")], [edge("a", "b", 1.0)]);
		let m = store.node("a").unwrap().metrics;
		assert_eq!(m.degree, 7);
		assert_eq!(m.weighted_degree, 3.5);
		assert_eq!(m.betweenness, 0.12);
	}

	#[test]
	fn invalid_values_fall_back() {
		let a = NodeRecord {
			betweenness: Some(f64::NAN),
			weighted_degree: Some(-2.0),
			..node("a")
		};
		let bad = EdgeRecord {
			weight: Some(f64::INFINITY),
			..edge("a", "b", 0.0)
		};
		let store = GraphStore::load(GraphKind::Undirected, [a, node("b")], [bad]);
		assert_eq!(store.edges().next().unwrap().weight, 1.0);
		let m = store.node("a").unwrap().metrics;
		assert_eq!(m.betweenness, 0.0);
		assert_eq!(m.weighted_degree, 0.0);
		assert_eq!(store.node("a").unwrap().label, "a");
	}

	#[test]
	fn neighbors_cover_both_directions_once() {
		let store = GraphStore::load(
			GraphKind::Directed,
			[node("a"), node("b"), node("c")],
			[edge("a", "b", 1.0), edge("b", "a", 1.0), edge("c", "a", 1.0)],
		);
		let mut ids: Vec<_> = store.neighbors_of("a").iter().map(|n| n.id.clone()).collect();
		ids.sort();
		assert_eq!(ids, ["b", "c"]);
		assert_eq!(store.incident_edges("a").count(), 3);
		assert!(store.neighbors_of("missing").is_empty());
	}

	#[test]
	fn duplicate_node_ids_keep_first() {
		let first = NodeRecord {
			label: Some("first".into()),
			..node("a")
		};
		let second = NodeRecord {
			label: Some("second".into()),
			..node("a")
		};
		let store = GraphStore::load(GraphKind::Undirected, [first, second], Vec::new());
		assert_eq!(store.node_count(), 1);
		assert_eq!(store.node("a").unwrap().label, "first");
	}
}
