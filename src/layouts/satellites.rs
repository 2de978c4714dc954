use std::any::Any;

use super::{Frame, Layout, Refreshable, Startable};
use crate::config::SatelliteConfig;
use crate::graph::{Graph, Satellite};

/// Position of the satellite of a vertex at `(x, y)` on a `width` x `height` canvas.
///
/// The satellite starts on its parent and is moved towards the canvas border of the
/// quadrant the parent is in. Of the two borders it only clamps against the one the
/// parent is closer to crossing, or against both once the parent is past both insets.
pub fn place_satellite(
	config: &SatelliteConfig,
	width: f64,
	height: f64,
	x: f64,
	y: f64,
) -> (f64, f64) {
	let gap = config.gap;
	let left = || config.left.min(x - gap);
	let right = || (width - config.right).max(x + gap);
	let top = || config.top.min(y - gap);
	let bottom = || (height - config.bottom).max(y + gap);

	let horizontal_room = if x < width / 2.0 {
		x - config.left
	} else {
		width - x - config.right
	};
	let vertical_room = if y < height / 2.0 {
		y - config.top
	} else {
		height - y - config.bottom
	};
	let clamp_x = || if x < width / 2.0 { left() } else { right() };
	let clamp_y = || if y < height / 2.0 { top() } else { bottom() };

	if horizontal_room < 0.0 && vertical_room < 0.0 {
		(clamp_x(), clamp_y())
	} else if horizontal_room < vertical_room {
		(clamp_x(), y)
	} else {
		(x, clamp_y())
	}
}

/// Maintains one satellite for every vertex that asks for one.
#[derive(Clone, Debug, Default)]
pub struct SatelliteLayout {
	config: SatelliteConfig,
}

impl SatelliteLayout {
	/// Satellites layout with `config`.
	pub fn new(config: SatelliteConfig) -> Self {
		Self { config }
	}

	/// Creates missing satellites and drops those no longer asked for.
	fn sync(graph: &mut Graph) {
		for vertex in graph.vertices_mut() {
			match (vertex.carries_satellite, vertex.satellite.is_some()) {
				(true, false) => vertex.satellite = Some(Satellite::of(vertex)),
				(false, true) => vertex.satellite = None,
				_ => {}
			}
		}
	}
}

impl Startable for SatelliteLayout {
	fn start(&mut self, graph: &mut Graph) {
		Self::sync(graph);
	}
}

impl Refreshable for SatelliteLayout {
	fn refresh(&mut self, frame: &mut Frame<'_>) {
		let graph = &mut *frame.graph;
		Self::sync(graph);
		let (width, height) = (graph.width(), graph.height());
		for vertex in graph.vertices_mut() {
			let (x, y) = place_satellite(&self.config, width, height, vertex.x, vertex.y);
			if let Some(satellite) = vertex.satellite.as_mut() {
				satellite.x = x;
				satellite.y = y;
			}
		}
	}
}

impl Layout for SatelliteLayout {
	fn name(&self) -> &str {
		"satellites"
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

#[cfg(test)]
mod tests {
	use super::*;

	fn place(x: f64, y: f64) -> (f64, f64) {
		place_satellite(&SatelliteConfig::default(), 800.0, 600.0, x, y)
	}

	#[test]
	fn clamps_against_the_nearer_border() {
		// Top-left quadrant, closer to the top than to the left.
		assert_eq!(place(100.0, 40.0), (100.0, 10.0));
		// Bottom-right quadrant, closer to the right border.
		assert_eq!(place(740.0, 400.0), (750.0, 400.0));
	}

	#[test]
	fn follows_the_parent_past_the_insets() {
		// Beyond both top-left insets: both coordinates stay just outside the parent.
		assert_eq!(place(5.0, 4.0), (3.0, 2.0));
		// Beyond the bottom inset only.
		assert_eq!(place(300.0, 590.0), (300.0, 592.0));
	}
}
