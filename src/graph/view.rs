//! Render directives derived from a [`Visibility`] and the hover state.
//!
//! The canvas never inspects filters itself; it looks every entity up in a
//! [`RenderPlan`] and draws what the plan says.

use std::collections::HashMap;
use std::fmt;

use super::resolve::Visibility;
use super::store::{EdgeId, GraphStore, NodeId};
use crate::config::StyleConfig;

/// Drawing parameters for a visible node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Visual size.
	pub size: f64,
	/// CSS color.
	pub color: String,
	/// Label to draw; `None` suppresses it.
	pub label: Option<String>,
	/// Set on the hovered node.
	pub emphasized: bool,
}

/// Drawing parameters for a visible edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Stroke width.
	pub size: f64,
	/// CSS color.
	pub color: String,
	/// Set on edges incident to the hovered node.
	pub emphasized: bool,
}

/// What to do with one node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeDirective {
	/// Not drawn.
	Hidden,
	/// Drawn with this style.
	Visible(NodeStyle),
}

/// What to do with one edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeDirective {
	/// Not drawn.
	Hidden,
	/// Drawn with this style.
	Visible(EdgeStyle),
}

/// Per-entity directives for one redraw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
	nodes: HashMap<NodeId, NodeDirective>,
	edges: HashMap<EdgeId, EdgeDirective>,
	hovered: Option<NodeId>,
}

impl RenderPlan {
	/// Builds directives for every stored node and edge. A hovered id that is
	/// not currently visible counts as no hover.
	pub fn build(
		store: &GraphStore,
		visibility: &Visibility,
		hovered: Option<&str>,
		style: &StyleConfig,
	) -> Self {
		let hovered = hovered.filter(|id| visibility.is_node_visible(id));

		let nodes = store
			.nodes()
			.map(|node| {
				let directive = if !visibility.is_node_visible(&node.id) {
					NodeDirective::Hidden
				} else {
					match hovered {
						Some(h) if h != node.id => NodeDirective::Visible(NodeStyle {
							size: (node.size * style.dim_scale).max(style.min_node_size),
							color: node.color.clone(),
							label: None,
							emphasized: false,
						}),
						_ => NodeDirective::Visible(NodeStyle {
							size: node.size,
							color: node.color.clone(),
							label: Some(node.label.clone()),
							emphasized: hovered.is_some(),
						}),
					}
				};
				(node.id.clone(), directive)
			})
			.collect();

		let edges = store
			.edges()
			.map(|edge| {
				let directive = if !visibility.is_edge_visible(&edge.id) {
					EdgeDirective::Hidden
				} else {
					EdgeDirective::Visible(match hovered {
						None => EdgeStyle {
							size: edge.size,
							color: edge.color.clone(),
							emphasized: false,
						},
						Some(h) if edge.touches(h) => EdgeStyle {
							size: style.emphasis_edge_size,
							color: style.emphasis_edge_color.clone(),
							emphasized: true,
						},
						Some(_) => EdgeStyle {
							size: style.muted_edge_size,
							color: style.muted_edge_color.clone(),
							emphasized: false,
						},
					})
				};
				(edge.id.clone(), directive)
			})
			.collect();

		RenderPlan {
			nodes,
			edges,
			hovered: hovered.map(str::to_owned),
		}
	}

	/// Directive for node `id`, `None` when the id is unknown.
	pub fn node(&self, id: &str) -> Option<&NodeDirective> {
		self.nodes.get(id)
	}

	/// Directive for edge `id`, `None` when the id is unknown.
	pub fn edge(&self, id: &str) -> Option<&EdgeDirective> {
		self.edges.get(id)
	}

	/// Style of a visible node.
	pub fn node_style(&self, id: &str) -> Option<&NodeStyle> {
		match self.nodes.get(id) {
			Some(NodeDirective::Visible(style)) => Some(style),
			_ => None,
		}
	}

	/// Style of a visible edge.
	pub fn edge_style(&self, id: &str) -> Option<&EdgeStyle> {
		match self.edges.get(id) {
			Some(EdgeDirective::Visible(style)) => Some(style),
			_ => None,
		}
	}

	/// The effective hovered node.
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}
}

/// Denominators of the status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
	/// Total nodes.
	pub nodes: usize,
	/// Total edges.
	pub edges: usize,
}

impl Totals {
	/// Stored counts of `store`.
	pub fn of(store: &GraphStore) -> Self {
		Totals {
			nodes: store.node_count(),
			edges: store.edge_count(),
		}
	}
}

/// Visible/total counts for status display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
	/// Visible nodes.
	pub visible_nodes: usize,
	/// Total nodes.
	pub total_nodes: usize,
	/// Visible edges.
	pub visible_edges: usize,
	/// Total edges.
	pub total_edges: usize,
}

impl Summary {
	/// Counts `visibility` against `totals`.
	pub fn new(visibility: &Visibility, totals: Totals) -> Self {
		Summary {
			visible_nodes: visibility.nodes.len(),
			total_nodes: totals.nodes,
			visible_edges: visibility.edges.len(),
			total_edges: totals.edges,
		}
	}
}

impl fmt::Display for Summary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Nodes: {} / {} | Edges: {} / {}",
			self.visible_nodes, self.total_nodes, self.visible_edges, self.total_edges
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::filter::{FilterState, MetricRanges};
	use crate::graph::resolve::resolve;
	use crate::graph::store::{EdgeRecord, GraphKind, NodeRecord};

	fn fixture() -> (GraphStore, FilterState) {
		let nodes = ["a", "b", "c", "d"].map(|id| NodeRecord {
			id: id.into(),
			size: Some(8.0),
			..Default::default()
		});
		let edges = [("ab", "a", "b", 1.0), ("bc", "b", "c", 1.0), ("cd", "c", "d", 0.1)].map(
			|(id, s, t, w)| EdgeRecord {
				id: Some(id.into()),
				source: s.into(),
				target: t.into(),
				weight: Some(w),
				..Default::default()
			},
		);
		let store = GraphStore::load(GraphKind::Undirected, nodes, edges);
		let filter = FilterState::new(&store, MetricRanges::observed(&store));
		(store, filter)
	}

	#[test]
	fn hidden_entities_get_hidden_directives() {
		let (store, mut filter) = fixture();
		filter.set_manual_visible("d", false);
		let plan = RenderPlan::build(&store, &resolve(&store, &filter), None, &StyleConfig::default());
		assert_eq!(plan.node("d"), Some(&NodeDirective::Hidden));
		assert_eq!(plan.edge("cd"), Some(&EdgeDirective::Hidden));
		assert!(plan.node_style("d").is_none());
	}

	#[test]
	fn no_hover_uses_entity_defaults() {
		let (store, filter) = fixture();
		let plan = RenderPlan::build(&store, &resolve(&store, &filter), None, &StyleConfig::default());
		let a = plan.node_style("a").unwrap();
		assert_eq!(a.size, 8.0);
		assert_eq!(a.label.as_deref(), Some("a"));
		let ab = plan.edge_style("ab").unwrap();
		assert_eq!(ab.color, store.edge("ab").unwrap().color);
		assert!(!ab.emphasized);
	}

	#[test]
	fn hover_dims_others_and_emphasizes_incident_edges() {
		let (store, filter) = fixture();
		let style = StyleConfig::default();
		let plan = RenderPlan::build(&store, &resolve(&store, &filter), Some("b"), &style);

		let b = plan.node_style("b").unwrap();
		assert!(b.emphasized);
		assert_eq!(b.size, 8.0);
		let a = plan.node_style("a").unwrap();
		assert_eq!(a.size, 8.0 * style.dim_scale);
		assert_eq!(a.label, None);

		let ab = plan.edge_style("ab").unwrap();
		assert!(ab.emphasized);
		assert_eq!(ab.color, style.emphasis_edge_color);
		let cd = plan.edge_style("cd").unwrap();
		assert_eq!(cd.size, style.muted_edge_size);
		assert_eq!(cd.color, style.muted_edge_color);
	}

	#[test]
	fn hovering_a_hidden_node_is_ignored() {
		let (store, mut filter) = fixture();
		filter.set_manual_visible("b", false);
		let vis = resolve(&store, &filter);
		let plan = RenderPlan::build(&store, &vis, Some("b"), &StyleConfig::default());
		assert_eq!(plan.hovered(), None);
		assert_eq!(plan.node_style("a").unwrap().label.as_deref(), Some("a"));
	}

	#[test]
	fn dimmed_size_has_a_floor() {
		let (store, filter) = fixture();
		let style = StyleConfig {
			dim_scale: 0.01,
			..StyleConfig::default()
		};
		let plan = RenderPlan::build(&store, &resolve(&store, &filter), Some("a"), &style);
		assert_eq!(plan.node_style("c").unwrap().size, style.min_node_size);
	}

	#[test]
	fn summary_formats_counts() {
		let (store, mut filter) = fixture();
		filter.set_edge_weight_threshold(0.5);
		filter.set_show_isolates(false);
		let summary = Summary::new(&resolve(&store, &filter), Totals::of(&store));
		assert_eq!(summary.to_string(), "Nodes: 3 / 4 | Edges: 2 / 3");
	}
}
