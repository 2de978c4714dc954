use std::any::Any;

use super::{Frame, Layout, Refreshable, Startable};
use crate::config::ZoomConfig;
use crate::graph::Graph;

/// Uniform scale plus translation from graph to screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation.
	pub x: f64,
	/// Vertical translation.
	pub y: f64,
	/// Scale.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No scaling, no translation.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Graph to screen.
	pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
		(self.x + x * self.k, self.y + y * self.k)
	}

	/// Screen to graph.
	pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
		((x - self.x) / self.k, (y - self.y) / self.k)
	}

	/// `self` applied after `inner`.
	pub fn compose(&self, inner: &Self) -> Self {
		let (x, y) = self.apply(inner.x, inner.y);
		Self {
			x,
			y,
			k: self.k * inner.k,
		}
	}
}

/// Largest scale that keeps extents `[o1x, o2x, o1y, o2y]` (distances from the focal
/// point to the left, right, top and bottom of the box) inside a `width` x `height`
/// viewport with `margin` to spare, the focal point mapped onto the viewport center.
pub fn fit_scale(width: f64, height: f64, margin: f64, extents: [f64; 4]) -> f64 {
	let [o1x, o2x, o1y, o2y] = extents;
	let factor_x = width / (2.0 * (1.0 + margin) * o1x.max(o2x));
	let factor_y = height / (2.0 * (1.0 + margin) * o1y.max(o2y));
	factor_x.min(factor_y)
}

/// Scales the canvas so the whole graph, layout bounds included, stays visible
/// around the root (or the canvas center without one).
#[derive(Clone, Debug, Default)]
pub struct ZoomLayout {
	config: ZoomConfig,
	transform: ViewTransform,
}

impl ZoomLayout {
	/// Zoom layout with `config`.
	pub fn new(config: ZoomConfig) -> Self {
		Self {
			config,
			transform: ViewTransform::IDENTITY,
		}
	}

	/// Last committed transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	fn focal_point(graph: &Graph) -> (f64, f64) {
		match graph.root().and_then(|id| graph.vertex(id)) {
			Some(root) => (root.x, root.y),
			None => {
				let center = graph.center();
				(center.x, center.y)
			}
		}
	}
}

impl Startable for ZoomLayout {
	fn start(&mut self, _graph: &mut Graph) {
		self.transform = ViewTransform::IDENTITY;
	}
}

impl Refreshable for ZoomLayout {
	fn refresh(&mut self, frame: &mut Frame<'_>) {
		let Some(bbox) = frame.bbox() else {
			return;
		};
		let graph = &*frame.graph;
		let (cx, cy) = Self::focal_point(graph);
		let (width, height) = (graph.width(), graph.height());
		let extents = [cx - bbox.left, bbox.right - cx, cy - bbox.top, bbox.bottom - cy];

		let scale = fit_scale(width, height, self.config.margin, extents);
		if !scale.is_finite() || scale <= 0.0 {
			return;
		}
		let scale = scale.max(self.config.min_scale).min(self.config.max_scale);
		if (scale / self.transform.k - 1.0).abs() <= self.config.tolerance {
			return;
		}
		self.transform = ViewTransform {
			x: width / 2.0 * (1.0 - scale),
			y: height / 2.0 * (1.0 - scale),
			k: scale,
		};
	}
}

impl Layout for ZoomLayout {
	fn name(&self) -> &str {
		"zoom"
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn as_startable(&mut self) -> Option<&mut dyn Startable> {
		Some(self)
	}

	fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
		Some(self)
	}
}
