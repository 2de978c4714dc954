use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::CanvasState;
use crate::graph::{Vertex, VertexId};
use crate::layouts::LabelLayout;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];
const ROOT_COLOR: &str = "#f5c542";
const SATELLITE_COLOR: &str = "#9aa5b1";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn color(vertex: &Vertex) -> &str {
	if vertex.is_root() {
		return ROOT_COLOR;
	}
	if let Some(color) = vertex.attributes.get("color").and_then(|value| value.as_str()) {
		return color;
	}
	let group = vertex
		.attributes
		.get("group")
		.and_then(|value| value.as_u64())
		.unwrap_or(0) as usize;
	COLORS[group % COLORS.len()]
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let transform = state.transform();
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(state, ctx, transform.k);
	draw_satellites(state, ctx, transform.k);
	draw_vertices(state, ctx, transform.k);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let graph = state.session.graph();
	let arrows = graph.config().arrows;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in graph.edges() {
		let (Some(source), Some(target)) = (graph.vertex(edge.source()), graph.vertex(edge.target()))
		else {
			continue;
		};
		let (x1, y1, x2, y2) = (source.x, source.y, target.x, target.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(source.id()) && state.is_highlighted(target.id());
		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		let head = if arrows { arrow_size } else { 0.0 };
		ctx.begin_path();
		ctx.move_to(x1 + ux * source.size, y1 + uy * source.size);
		ctx.line_to(x2 - ux * (target.size + head), y2 - uy * (target.size + head));
		ctx.stroke();

		if !arrows {
			continue;
		}
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * target.size, y2 - uy * target.size);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_satellites(state: &CanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let graph = state.session.graph();
	ctx.set_line_width(0.75 / k);
	for (parent, satellite) in graph.satellites() {
		let Some(parent) = graph.vertex(parent) else {
			continue;
		};
		ctx.set_stroke_style_str("rgba(154, 165, 177, 0.4)");
		ctx.begin_path();
		ctx.move_to(parent.x, parent.y);
		ctx.line_to(satellite.x, satellite.y);
		ctx.stroke();

		let side = satellite.size * 2.0;
		ctx.set_fill_style_str(SATELLITE_COLOR);
		ctx.fill_rect(satellite.x - satellite.size, satellite.y - satellite.size, side, side);
	}
}

fn draw_vertex(ctx: &CanvasRenderingContext2d, vertex: &Vertex, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(vertex.x, vertex.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color(vertex));
	ctx.fill();
}

fn draw_vertices(state: &CanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let graph = state.session.graph();
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	for vertex in graph.vertices() {
		if has_highlight && state.is_highlighted(vertex.id()) {
			continue;
		}
		ctx.set_global_alpha(1.0 - 0.7 * t);
		draw_vertex(ctx, vertex, vertex.size * (1.0 - 0.15 * t));
		ctx.set_global_alpha(1.0);
	}

	if !has_highlight {
		return;
	}

	// Highlighted vertices go on top, with a glow around the hovered one and its neighbors.
	for vertex in graph.vertices().filter(|vertex| state.is_highlighted(vertex.id())) {
		let (x, y, size) = (vertex.x, vertex.y, vertex.size);
		let is_hovered = state.is_hovered(vertex.id());
		let is_neighbor = is_neighbor(state, vertex.id());

		let (radius, glow_radius) = if is_hovered {
			(size * (1.0 + 0.35 * t), size * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(size * (1.0 + 0.2 * t), size * (1.4 + 0.6 * t))
		} else {
			(size, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
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

		draw_vertex(ctx, vertex, radius);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	}
}

fn is_neighbor(state: &CanvasState, vertex: VertexId) -> bool {
	state.hover.neighbors.contains(&vertex) || state.hover.prev_neighbors.contains(&vertex)
}

/// Label text at the boxes the label layout placed; nothing without that layout.
fn draw_labels(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(labels) = state.session.find_layout::<LabelLayout>() else {
		return;
	};
	let graph = state.session.graph();
	let t = ease_out_cubic(state.hover.highlight_t);
	// Sized in graph units to match the layout's glyph estimate.
	ctx.set_font("11px sans-serif");
	ctx.set_text_baseline("top");

	for vertex in graph.vertices() {
		let Some(label) = labels.label(vertex.id()) else {
			continue;
		};
		let alpha = if state.has_active_highlight() && !state.is_highlighted(vertex.id()) {
			0.8 - 0.6 * t
		} else {
			0.8
		};
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha));
		let (left, top) = (vertex.x + label.dx, vertex.y + label.dy);
		let line_height = label.height / label.lines.len().max(1) as f64;
		for (row, line) in label.lines.iter().enumerate() {
			let _ = ctx.fill_text(line, left, top + row as f64 * line_height);
		}
	}
}
