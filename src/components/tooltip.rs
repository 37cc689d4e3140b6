use std::sync::Arc;

use leptos::prelude::*;

use crate::graph::attrs::{display_rows, format_int, format_number};
use crate::graph::{GraphStore, Node, RenderPlan};

const PAD: f64 = 12.0;
// used before the tooltip has been laid out
const FALLBACK_SIZE: (f64, f64) = (320.0, 140.0);

/// Last pointer position inside the graph area, with that area's size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPos {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl PointerPos {
	/// Top-left corner for a `w`×`h` tooltip next to the pointer, kept inside
	/// the area where it fits.
	pub fn tooltip_origin(&self, (w, h): (f64, f64)) -> (f64, f64) {
		let max_x = (self.width - w - PAD).max(PAD);
		let max_y = (self.height - h - PAD).max(PAD);
		(
			(self.x + PAD).clamp(PAD, max_x),
			(self.y + PAD).clamp(PAD, max_y),
		)
	}
}

/// Metric rows followed by the node's attribute rows.
pub fn tooltip_rows(node: &Node) -> Vec<(String, String)> {
	let mut rows = vec![
		("Node ID".to_string(), node.id.clone()),
		("Degree".to_string(), format_int(node.metrics.degree as f64)),
		(
			"Weighted degree".to_string(),
			format_number(node.metrics.weighted_degree, 3),
		),
		(
			"Betweenness".to_string(),
			format_number(node.metrics.betweenness, 6),
		),
	];
	rows.extend(display_rows(&node.attrs));
	rows
}

/// Details of the hovered node, following the pointer.
#[component]
pub fn NodeTooltip(
	store: Arc<GraphStore>,
	#[prop(into)] plan: Signal<RenderPlan>,
	#[prop(into)] pointer: Signal<PointerPos>,
) -> impl IntoView {
	move || {
		let id = plan.with(|p| p.hovered().map(str::to_owned))?;
		let node = store.node(&id)?;
		let (left, top) = pointer.get().tooltip_origin(FALLBACK_SIZE);
		let rows = tooltip_rows(node)
			.into_iter()
			.map(|(k, v)| {
				view! {
					<div class="row">
						<div class="k">{k}</div>
						<div class="v">{v}</div>
					</div>
				}
			})
			.collect_view();

		Some(view! {
			<div class="tooltip" style:left=format!("{left}px") style:top=format!("{top}px")>
				<div class="t-title">{node.label.clone()}</div>
				{rows}
			</div>
		})
	}
}
