//! Layout modules and the pipeline that runs them every frame.
//!
//! A module opts into each stage through a capability accessor on [`Layout`]; the
//! defaults opt out, so a module only implements what it needs. Modules run in
//! registration order and share the graph's coordinates: whatever an earlier module
//! writes during a frame is visible to the later ones.

mod force;
mod labels;
mod radial;
mod satellites;
mod zoom;

use std::any::Any;

use log::info;

use crate::error::Result;
use crate::graph::{BBox, Graph, VertexId};

pub use force::ForceLayout;
pub use labels::{LabelBox, LabelLayout, wrap};
pub use radial::RadialLayout;
pub use satellites::{SatelliteLayout, place_satellite};
pub use zoom::{ViewTransform, ZoomLayout, fit_scale};

/// Hooks run when the whole graph starts or stops its run loop.
pub trait Startable {
	/// Called when the run starts.
	fn start(&mut self, graph: &mut Graph);

	/// Called when the run stops.
	fn stop(&mut self, _graph: &mut Graph) {}
}

/// Per-frame geometry update, suspended while a vertex is dragged.
pub trait Refreshable {
	/// Updates geometry for one frame.
	fn refresh(&mut self, frame: &mut Frame<'_>);
}

/// Physics stepping; keeps running during drags.
pub trait Integrator {
	/// Advances the simulation by `dt` seconds.
	fn step(&mut self, graph: &mut Graph, dt: f32);
}

/// Extra bounds a module draws around a vertex (a label, for instance).
pub trait Boundable {
	/// Bounds drawn around `vertex`, if any.
	fn bbox(&self, graph: &Graph, vertex: VertexId) -> Option<BBox>;
}

/// Contribution to the settling metric; the run stops once the maximum over all
/// sources falls under the graph's threshold.
pub trait SettlingSource {
	/// Current settling metric; lower is calmer.
	fn alpha(&self) -> f64;
}

/// A layout module; each `as_*` accessor opts into one capability.
pub trait Layout {
	/// Short identifier used in logs.
	fn name(&self) -> &str;

	/// For [`LayoutPipeline::find`].
	fn as_any(&self) -> &dyn Any;

	/// For [`LayoutPipeline::find_mut`].
	fn as_any_mut(&mut self) -> &mut dyn Any;

	/// Start/stop hooks.
	fn as_startable(&mut self) -> Option<&mut dyn Startable> {
		None
	}

	/// Per-frame geometry.
	fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
		None
	}

	/// Physics stepping.
	fn as_integrator(&mut self) -> Option<&mut dyn Integrator> {
		None
	}

	/// Extra bounds.
	fn as_boundable(&self) -> Option<&dyn Boundable> {
		None
	}

	/// Settling metric.
	fn as_settling_source(&self) -> Option<&dyn SettlingSource> {
		None
	}
}

/// What a refreshing module sees: the graph, writable, and every other module for bounds.
pub struct Frame<'a> {
	/// The graph being laid out.
	pub graph: &'a mut Graph,
	before: &'a [Box<dyn Layout>],
	after: &'a [Box<dyn Layout>],
}

impl Frame<'_> {
	/// Graph envelope including the bounds other modules contribute.
	pub fn bbox(&self) -> Option<BBox> {
		compound_bbox(&*self.graph, &[self.before, self.after])
	}
}

fn vertex_bounds(graph: &Graph, groups: &[&[Box<dyn Layout>]], vertex: VertexId) -> Result<BBox> {
	let own = graph.vertex_bbox(vertex)?;
	Ok(groups
		.iter()
		.flat_map(|group| group.iter())
		.filter_map(|layout| layout.as_boundable()?.bbox(graph, vertex))
		.fold(own, |bbox, extra| bbox.union(&extra)))
}

fn compound_bbox(graph: &Graph, groups: &[&[Box<dyn Layout>]]) -> Option<BBox> {
	BBox::envelope(
		graph
			.vertices()
			.filter_map(|vertex| vertex_bounds(graph, groups, vertex.id()).ok()),
	)
}

/// The ordered set of active layout modules of one graph.
#[derive(Default)]
pub struct LayoutPipeline {
	layouts: Vec<Box<dyn Layout>>,
}

impl LayoutPipeline {
	/// Replaces the whole set.
	pub fn set(&mut self, layouts: Vec<Box<dyn Layout>>) {
		info!(
			"layouts: [{}]",
			layouts.iter().map(|layout| layout.name()).collect::<Vec<_>>().join(", ")
		);
		self.layouts = layouts;
	}

	/// Number of modules.
	pub fn len(&self) -> usize {
		self.layouts.len()
	}

	/// Whether no module is active.
	pub fn is_empty(&self) -> bool {
		self.layouts.is_empty()
	}

	/// Module names in order.
	pub fn names(&self) -> Vec<&str> {
		self.layouts.iter().map(|layout| layout.name()).collect()
	}

	/// First module of type `T`.
	pub fn find<T: Layout + 'static>(&self) -> Option<&T> {
		self.layouts
			.iter()
			.find_map(|layout| layout.as_any().downcast_ref::<T>())
	}

	/// First module of type `T`, mutably.
	pub fn find_mut<T: Layout + 'static>(&mut self) -> Option<&mut T> {
		self.layouts
			.iter_mut()
			.find_map(|layout| layout.as_any_mut().downcast_mut::<T>())
	}

	/// Starts every startable module, in order.
	pub fn start(&mut self, graph: &mut Graph) {
		for layout in &mut self.layouts {
			if let Some(module) = layout.as_startable() {
				module.start(graph);
			}
		}
	}

	/// Stops every startable module, in order.
	pub fn stop(&mut self, graph: &mut Graph) {
		for layout in &mut self.layouts {
			if let Some(module) = layout.as_startable() {
				module.stop(graph);
			}
		}
	}

	/// Runs every integrator, drag or not.
	pub fn step(&mut self, graph: &mut Graph, dt: f32) {
		for layout in &mut self.layouts {
			if let Some(module) = layout.as_integrator() {
				module.step(graph, dt);
			}
		}
	}

	/// One refresh frame over every refreshable module, in order.
	pub fn refresh(&mut self, graph: &mut Graph) {
		for index in 0..self.layouts.len() {
			let (before, rest) = self.layouts.split_at_mut(index);
			let Some((current, after)) = rest.split_first_mut() else {
				break;
			};
			if let Some(module) = current.as_refreshable() {
				let mut frame = Frame {
					graph: &mut *graph,
					before: &*before,
					after: &*after,
				};
				module.refresh(&mut frame);
			}
		}
	}

	/// Maximum alpha over every module, `None` for an empty pipeline.
	///
	/// A module that is not a settling source counts as already at rest (`0`).
	pub fn alpha(&self) -> Option<f64> {
		self.layouts
			.iter()
			.map(|layout| layout.as_settling_source().map_or(0.0, SettlingSource::alpha))
			.reduce(f64::max)
	}

	/// Graph envelope including every module's bounds.
	pub fn bbox(&self, graph: &Graph) -> Option<BBox> {
		compound_bbox(graph, &[self.layouts.as_slice()])
	}

	/// Bounds of one vertex including every module's contribution.
	pub fn vertex_bbox(&self, graph: &Graph, vertex: VertexId) -> Result<BBox> {
		vertex_bounds(graph, &[self.layouts.as_slice()], vertex)
	}
}
