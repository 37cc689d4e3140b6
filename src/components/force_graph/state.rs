use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{DragState, EdgeSlot, HoverState, NodeInfo, PanState, ViewTransform};
use crate::config::{ExplorerConfig, LayoutConfig, StyleConfig};
use crate::graph::{GraphKind, GraphStore, NodeId, RenderPlan};

const FIT_MARGIN: f64 = 40.0;

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeSlot>,
	pub plan: RenderPlan,
	pub style: StyleConfig,
	pub layout: LayoutConfig,
	pub directed: bool,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	home: ViewTransform,
}

impl ForceGraphState {
	pub fn new(
		store: &GraphStore,
		plan: RenderPlan,
		config: &ExplorerConfig,
		width: f64,
		height: f64,
	) -> Self {
		let layout = config.layout.clone();
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: layout.force_charge,
			force_spring: layout.force_spring,
			force_max: layout.force_max,
			node_speed: layout.node_speed,
			damping_factor: layout.damping_factor,
		});
		let mut id_to_idx = HashMap::new();
		let mut floating = false;
		let count = store.node_count().max(1) as f64;

		for (i, node) in store.nodes().enumerate() {
			// precomputed positions are fixed, the rest settle under simulation
			let (x, y, is_anchor) = match node.position {
				Some((x, y)) => (x * layout.position_scale, y * layout.position_scale, true),
				None => {
					floating = true;
					let angle = (i as f64) * 2.0 * PI / count;
					(
						layout.seed_radius * angle.cos(),
						layout.seed_radius * angle.sin(),
						false,
					)
				}
			};
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		let edges = store
			.edges()
			.filter_map(|edge| {
				let source = *id_to_idx.get(&edge.source)?;
				let target = *id_to_idx.get(&edge.target)?;
				graph.add_edge(source, target, EdgeData::default());
				Some(EdgeSlot {
					id: edge.id.clone(),
					source,
					target,
				})
			})
			.collect();

		let mut state = Self {
			graph,
			edges,
			plan,
			style: config.style.clone(),
			layout,
			directed: store.kind() == GraphKind::Directed,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: floating,
			home: ViewTransform::default(),
		};
		state.home = state.fit_transform();
		state.transform = state.home;
		state
	}

	/// Transform that centers every node in the canvas.
	fn fit_transform(&self) -> ViewTransform {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
				None => (x, y, x, y),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
		};
		let (bw, bh) = (x1 - x0 + 2.0 * FIT_MARGIN, y1 - y0 + 2.0 * FIT_MARGIN);
		let k = (self.width / bw)
			.min(self.height / bh)
			.clamp(self.layout.min_zoom, self.layout.max_zoom);
		ViewTransform {
			x: self.width / 2.0 - k * (x0 + x1) / 2.0,
			y: self.height / 2.0 - k * (y0 + y1) / 2.0,
			k,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Closest visible node under the pointer. Hidden nodes are not
	/// hit-testable.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found: Option<(DefaultNodeIdx, f64)> = None;
		self.graph.visit_nodes(|node| {
			let Some(style) = self.plan.node_style(&node.data.user_data.id) else {
				return;
			};
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			// hit radius is in world-space, scales with zoom like nodes
			if dist < style.size.max(self.layout.hit_radius)
				&& found.is_none_or(|(_, best)| dist < best)
			{
				found = Some((node.index(), dist));
			}
		});
		found.map(|(idx, _)| idx)
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
		}
		if node.is_some() && self.hover.node.is_none() {
			self.hover.highlight_t = 0.0;
		}
		self.hover.node = node;
		true
	}

	pub fn hovered_id(&self) -> Option<NodeId> {
		self.hover.node.and_then(|idx| self.node_id(idx))
	}

	/// Swaps in a new plan. Hover on a node that is no longer drawn is
	/// dropped; returns whether that happened.
	pub fn set_plan(&mut self, plan: RenderPlan) -> bool {
		self.plan = plan;
		let stale = self
			.hovered_id()
			.is_some_and(|id| self.plan.node_style(&id).is_none());
		if stale {
			self.hover = HoverState::default();
		}
		stale
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(self.layout.min_zoom, self.layout.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn reset_view(&mut self) {
		self.transform = self.home;
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}
		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.home = self.fit_transform();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::store::{EdgeRecord, NodeRecord};
	use crate::graph::{FilterState, MetricRanges, resolve};

	fn positioned(id: &str, x: f64, y: f64) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			position: Some((x, y)),
			size: Some(5.0),
			..Default::default()
		}
	}

	fn fixture() -> (GraphStore, FilterState) {
		let store = GraphStore::load(
			GraphKind::Undirected,
			[positioned("a", -5.0, 0.0), positioned("b", 5.0, 0.0)],
			[EdgeRecord {
				source: "a".into(),
				target: "b".into(),
				..Default::default()
			}],
		);
		let filter = FilterState::new(&store, MetricRanges::observed(&store));
		(store, filter)
	}

	fn plan(store: &GraphStore, filter: &FilterState) -> RenderPlan {
		RenderPlan::build(store, &resolve(store, filter), None, &StyleConfig::default())
	}

	#[test]
	fn fit_centers_positioned_nodes() {
		let (store, filter) = fixture();
		let state = ForceGraphState::new(&store, plan(&store, &filter), &ExplorerConfig::default(), 800.0, 600.0);
		assert!(!state.animation_running);
		let (gx, gy) = state.screen_to_graph(400.0, 300.0);
		assert!(gx.abs() < 1e-6 && gy.abs() < 1e-6);
	}

	#[test]
	fn hidden_nodes_are_not_hit() {
		let (store, mut filter) = fixture();
		let mut state = ForceGraphState::new(&store, plan(&store, &filter), &ExplorerConfig::default(), 800.0, 600.0);
		let mut a = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id == "a" {
				a = Some(node.index());
			}
		});
		let a = a.unwrap();
		let t = state.transform;
		let (sx, sy) = (t.x + t.k * -200.0, t.y);
		assert_eq!(state.node_at_position(sx, sy), Some(a));
		assert_eq!(state.node_id(a).as_deref(), Some("a"));

		assert!(state.set_hover(Some(a)));
		assert_eq!(state.hovered_id().as_deref(), Some("a"));

		filter.set_manual_visible("a", false);
		assert!(state.set_plan(plan(&store, &filter)));
		assert_eq!(state.hovered_id(), None);
		assert_eq!(state.node_at_position(sx, sy), None);
	}

	#[test]
	fn zoom_keeps_anchor_point_fixed() {
		let (store, filter) = fixture();
		let mut state = ForceGraphState::new(&store, plan(&store, &filter), &ExplorerConfig::default(), 800.0, 600.0);
		let before = state.screen_to_graph(100.0, 50.0);
		state.zoom_at(100.0, 50.0, 1.25);
		let after = state.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		state.reset_view();
		assert_eq!(state.transform, state.home);
	}

	#[test]
	fn resize_refits_the_home_view() {
		let (store, filter) = fixture();
		let mut state = ForceGraphState::new(&store, plan(&store, &filter), &ExplorerConfig::default(), 800.0, 600.0);
		let before = state.home;
		state.resize(400.0, 300.0);
		assert_eq!((state.width, state.height), (400.0, 300.0));
		assert_ne!(state.home, before);
		state.reset_view();
		let (gx, gy) = state.screen_to_graph(200.0, 150.0);
		assert!(gx.abs() < 1e-6 && gy.abs() < 1e-6);
	}

	#[test]
	fn unpositioned_nodes_are_simulated() {
		let store = GraphStore::load(
			GraphKind::Directed,
			[NodeRecord {
				id: "x".into(),
				..Default::default()
			}],
			Vec::new(),
		);
		let filter = FilterState::new(&store, MetricRanges::observed(&store));
		let state = ForceGraphState::new(&store, plan(&store, &filter), &ExplorerConfig::default(), 800.0, 600.0);
		assert!(state.animation_running);
		assert!(state.directed);
	}
}
