use force_graph::DefaultNodeIdx;

use crate::graph::{EdgeId, NodeId};

/// Per-node payload carried through the force simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
}

/// Simulation-side edge, kept to look edge directives up by id.
#[derive(Clone, Debug)]
pub struct EdgeSlot {
	pub id: EdgeId,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub highlight_t: f64,
}
