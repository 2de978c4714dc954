use std::collections::HashSet;

use crate::graph::{EventKind, Item, VertexId};
use crate::layouts::{ViewTransform, ZoomLayout};
use crate::session::Session;

/// Extra pick tolerance around a vertex, in graph units.
pub const HIT_SLOP: f64 = 6.0;

const MIN_USER_ZOOM: f64 = 0.1;
const MAX_USER_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub vertex: Option<VertexId>,
	pub start_x: f64,
	pub start_y: f64,
	pub vertex_start_x: f64,
	pub vertex_start_y: f64,
	pub moved: bool,
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
	pub vertex: Option<VertexId>,
	pub neighbors: HashSet<VertexId>,
	pub highlight_t: f64,
	pub prev_vertex: Option<VertexId>,
	pub prev_neighbors: HashSet<VertexId>,
	delay_t: f64,
}

/// Everything the canvas keeps between frames: the session plus pointer state.
///
/// The drawn transform is the user's pan/zoom applied on top of the zoom layout's fit.
pub struct CanvasState {
	pub session: Session,
	pub view: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl CanvasState {
	pub fn new(mut session: Session) -> Self {
		let (width, height) = (session.graph().width(), session.graph().height());
		session.start();
		Self {
			session,
			view: ViewTransform::IDENTITY,
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		let fit = self
			.session
			.find_layout::<ZoomLayout>()
			.map(ZoomLayout::transform)
			.unwrap_or_default();
		self.view.compose(&fit)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform().invert(sx, sy)
	}

	pub fn vertex_at(&self, sx: f64, sy: f64) -> Option<VertexId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.session
			.graph()
			.vertices()
			.filter(|vertex| (vertex.x - gx).hypot(vertex.y - gy) < vertex.size + HIT_SLOP)
			.last()
			.map(|vertex| vertex.id())
	}

	pub fn set_hover(&mut self, vertex: Option<VertexId>) {
		if self.hover.vertex == vertex {
			return;
		}
		let was_hovering = self.hover.vertex.is_some();
		let graph = self.session.graph();
		if let Some(previous) = self.hover.vertex {
			graph.notify(Item::Vertex(previous), EventKind::MouseOut);
		}
		if let Some(current) = vertex {
			graph.notify(Item::Vertex(current), EventKind::MouseOver);
		}

		// Keep the old highlight around while it fades out.
		if was_hovering && vertex.is_none() {
			self.hover.prev_vertex = self.hover.vertex.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_vertex = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.vertex = vertex;
		self.hover.neighbors.clear();

		if let Some(current) = vertex.and_then(|id| graph.vertex(id)) {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors.extend(current.successors());
			self.hover.neighbors.extend(current.predecessors());
		}
	}

	pub fn is_highlighted(&self, vertex: VertexId) -> bool {
		self.hover.vertex == Some(vertex)
			|| self.hover.neighbors.contains(&vertex)
			|| self.hover.prev_vertex == Some(vertex)
			|| self.hover.prev_neighbors.contains(&vertex)
	}

	pub fn is_hovered(&self, vertex: VertexId) -> bool {
		self.hover.vertex == Some(vertex) || self.hover.prev_vertex == Some(vertex)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.vertex.is_some() || self.hover.prev_vertex.is_some()
	}

	pub fn begin_drag(&mut self, vertex: VertexId, sx: f64, sy: f64) {
		let Some(start) = self.session.graph().vertex(vertex).map(|v| (v.x, v.y)) else {
			return;
		};
		if self.session.drag_start(vertex).is_err() {
			return;
		}
		self.session.graph().notify(Item::Vertex(vertex), EventKind::MouseDown);
		self.drag = DragState {
			vertex: Some(vertex),
			start_x: sx,
			start_y: sy,
			vertex_start_x: start.0,
			vertex_start_y: start.1,
			moved: false,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let k = self.transform().k;
		let (dx, dy) = ((sx - self.drag.start_x) / k, (sy - self.drag.start_y) / k);
		self.drag.moved |= dx != 0.0 || dy != 0.0;
		self.session
			.drag_to(self.drag.vertex_start_x + dx, self.drag.vertex_start_y + dy);
	}

	/// Ends a drag; a press without movement counts as a click.
	pub fn end_drag(&mut self) {
		let Some(vertex) = self.drag.vertex.take() else {
			return;
		};
		let graph = self.session.graph();
		graph.notify(Item::Vertex(vertex), EventKind::MouseUp);
		if !self.drag.moved {
			graph.notify(Item::Vertex(vertex), EventKind::Click);
		}
		self.session.drag_end();
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.view.x,
			transform_start_y: self.view.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.view.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.view.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Scales the user view by `factor`, keeping the graph point under the cursor in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let k = (self.view.k * factor).clamp(MIN_USER_ZOOM, MAX_USER_ZOOM);
		let ratio = k / self.view.k;
		self.view.x = sx - (sx - self.view.x) * ratio;
		self.view.y = sy - (sy - self.view.y) * ratio;
		self.view.k = k;
	}

	/// Drops every pointer gesture in progress.
	pub fn release(&mut self) {
		self.end_drag();
		self.pan.active = false;
	}

	pub fn tick(&mut self, dt: f32) {
		self.session.tick(dt);
		self.flow_time += f64::from(dt);

		let dt = f64::from(dt);
		let (target, delay, speed) = if self.hover.vertex.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.vertex.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_vertex = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Adopts a new canvas size; the next run re-centers on the root.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.session.graph_mut().resize(width, height);
		self.session.start();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn state() -> CanvasState {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: None,
			color: None,
			group: None,
			satellite: false,
		};
		let data = GraphData {
			nodes: vec![node("hub"), node("leaf")],
			links: vec![GraphLink {
				source: "hub".into(),
				target: "leaf".into(),
			}],
			root: Some("hub".into()),
		};
		CanvasState::new(data.session(800.0, 600.0).unwrap())
	}

	#[test]
	fn picks_and_highlights_neighbors() {
		let mut state = state();
		let transform = state.transform();
		let (sx, sy) = transform.apply(400.0, 300.0);
		let hub = state.vertex_at(sx, sy).unwrap();
		assert_eq!(Some(hub), state.session.graph().root());

		state.set_hover(Some(hub));
		let leaf = state.session.graph().get("leaf").unwrap();
		assert!(state.is_highlighted(leaf));
		state.set_hover(None);
		assert!(state.is_hovered(hub));
		assert!(state.has_active_highlight());
	}

	#[test]
	fn click_without_motion_releases_the_drag() {
		let mut state = state();
		let leaf = state.session.graph().get("leaf").unwrap();
		state.begin_drag(leaf, 10.0, 10.0);
		assert_eq!(state.session.dragging(), Some(leaf));
		state.end_drag();
		assert_eq!(state.session.dragging(), None);
		assert!(state.session.running());
	}

	#[test]
	fn wheel_zoom_keeps_the_cursor_point() {
		let mut state = state();
		let before = state.screen_to_graph(120.0, 80.0);
		state.zoom_at(120.0, 80.0, 1.1);
		let after = state.screen_to_graph(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		state.begin_pan(0.0, 0.0);
		state.pan_to(30.0, -10.0);
		state.release();
		state.pan_to(90.0, 90.0);
		assert!((state.view.y - (80.0 - (80.0 * 1.1) - 10.0)).abs() < 1e-9);
	}
}
