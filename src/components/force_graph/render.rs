use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::graph::view::NodeStyle;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.style.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// World position and radius of every drawn node.
fn visible_positions(state: &ForceGraphState) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
	let mut positions = HashMap::new();
	state.graph.visit_nodes(|node| {
		if let Some(style) = state.plan.node_style(&node.data.user_data.id) {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64, style.size));
		}
	});
	positions
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow_size = 6.0 / k;
	let positions = visible_positions(state);

	for slot in &state.edges {
		let Some(style) = state.plan.edge_style(&slot.id) else {
			continue;
		};
		let (Some(&(x1, y1, _)), Some(&(x2, y2, r2))) =
			(positions.get(&slot.source), positions.get(&slot.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		ctx.set_stroke_style_str(&style.color);
		ctx.set_line_width(style.size / k);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		if !state.directed {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_fill_style_str(&style.color);
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let k = state.transform.k;
	let mut emphasized = None;

	state.graph.visit_nodes(|node| {
		let Some(style) = state.plan.node_style(&node.data.user_data.id) else {
			return;
		};
		let (x, y) = (node.x() as f64, node.y() as f64);
		if style.emphasized {
			// drawn last, above everything else
			emphasized = Some((x, y, style.clone()));
			return;
		}
		draw_node(state, ctx, x, y, style);
	});

	let Some((x, y, style)) = emphasized else {
		return;
	};

	if t > 0.01 {
		let glow_radius = style.size * (1.4 + 1.2 * t);
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, style.size * 0.3, x, y, glow_radius) {
			let alpha = 0.35 * t;
			let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
			let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	draw_node(state, ctx, x, y, &style);

	if t > 0.01 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, style.size + 2.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
		ctx.set_line_width(1.5 / k);
		ctx.stroke();
	}
}

fn draw_node(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, x: f64, y: f64, style: &NodeStyle) {
	let k = state.transform.k;
	ctx.begin_path();
	let _ = ctx.arc(x, y, style.size, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&style.color);
	ctx.fill();

	let Some(label) = &style.label else {
		return;
	};
	if style.size * k < state.style.label_min_size && !style.emphasized {
		return;
	}
	ctx.set_fill_style_str(&state.style.label_color);
	ctx.set_font(&format!("{}px {}", 10.0 / k.max(0.5), state.style.label_font));
	let _ = ctx.fill_text(label, x + style.size + 3.0 / k, y + 3.0 / k);
}
