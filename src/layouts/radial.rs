use std::any::Any;

use log::warn;

use super::{Frame, Layout, Refreshable};

/// Keeps every non-root vertex outside a ring around the canvas center whose
/// radius is the vertex's level times the maximum edge length.
///
/// One-sided: vertices already outside their ring are left to the physics.
#[derive(Clone, Debug, Default)]
pub struct RadialLayout;

impl RadialLayout {
	/// Radial layout; rings are sized by the graph's edge length.
	pub fn new() -> Self {
		Self
	}
}

impl Refreshable for RadialLayout {
	fn refresh(&mut self, frame: &mut Frame<'_>) {
		let center = frame.graph.center();
		let ring = frame.graph.max_edge_length();
		for vertex in frame.graph.vertices_mut().filter(|vertex| !vertex.is_root()) {
			let (dx, dy) = (vertex.x - center.x, vertex.y - center.y);
			let distance = dx.hypot(dy);
			let annulus = f64::from(vertex.level()) * ring;
			if distance >= annulus {
				continue;
			}
			if distance == 0.0 {
				warn!("{} sits on the center, no direction to push it", vertex.name());
				continue;
			}
			let push = annulus - distance;
			vertex.x += dx / distance * push;
			vertex.y += dy / distance * push;
		}
	}
}

impl Layout for RadialLayout {
	fn name(&self) -> &str {
		"radial"
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
		Some(self)
	}
}
