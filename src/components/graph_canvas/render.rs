use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::CanvasState;
use crate::style::NodeStyle;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Clears the canvas to the stylesheet background.
pub fn clear(ctx: &CanvasRenderingContext2d, background: &str, width: f64, height: f64) {
	ctx.set_fill_style_str(background);
	ctx.fill_rect(0.0, 0.0, width, height);
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	clear(ctx, state.style.background, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let edge = &state.style.edge;
	let radius = state.style.node_radius();
	let arrow_size = edge.arrow_size;
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		// highlighted edges stay solid, the rest fade while a node is hovered
		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let alpha = if is_highlighted || !state.has_active_highlight() {
			1.0
		} else {
			1.0 - 0.75 * t
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.line_color);
		ctx.set_line_width(edge.width);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * radius, y1 + uy * radius);
		ctx.line_to(
			x2 - ux * (radius + arrow_size),
			y2 - uy * (radius + arrow_size),
		);
		ctx.stroke();

		ctx.set_fill_style_str(edge.arrow_color);
		let (tip_x, tip_y) = (x2 - ux * radius, y2 - uy * radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
	ctx.set_global_alpha(1.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, style: &NodeStyle, label: &str, x: f64, y: f64, k: f64) {
	let radius = style.size / 2.0;

	if let Some(border) = style.border_color {
		ctx.set_global_alpha(style.border_opacity);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + style.border_width / 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(style.border_width);
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(style.fill);
	ctx.fill();

	ctx.set_font(&format!("{}px sans-serif", style.font_size / k.max(1.0)));
	ctx.set_text_align("center");
	let label_y = y - radius - 4.0;
	ctx.set_stroke_style_str(style.outline_color);
	ctx.set_line_width(style.outline_width);
	let _ = ctx.stroke_text(label, x, label_y);
	ctx.set_fill_style_str(style.label_color);
	let _ = ctx.fill_text(label, x, label_y);
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		ctx.set_global_alpha(if has_highlight { 1.0 - 0.7 * t } else { 1.0 });
		let (x, y) = (node.x() as f64, node.y() as f64);
		draw_node(ctx, &state.style.node, &node.data.user_data.label, x, y, k);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	// highlighted nodes go on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let style = if state.is_hovered(idx) {
			&state.style.selected
		} else {
			&state.style.node
		};
		let (x, y) = (node.x() as f64, node.y() as f64);
		draw_node(ctx, style, &node.data.user_data.label, x, y, k);
	});
}
