//! The run loop: one graph, its layout pipeline, and the frame-by-frame driver.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use crate::config::GraphConfig;
use crate::error::Result;
use crate::format::Format;
use crate::graph::{BBox, Graph, VertexId};
use crate::layouts::{Layout, LayoutPipeline};

/// Run-loop notifications a [`Session`] dispatches to its listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
	/// A run started.
	Start,
	/// Every tick, before the layouts refresh.
	Refresh,
	/// The run settled.
	End,
}

type Listener = Rc<dyn Fn(&Graph)>;

#[derive(Clone, Copy, Debug)]
struct Drag {
	vertex: VertexId,
	was_fixed: bool,
}

/// Owns a [`Graph`] together with its [`LayoutPipeline`] and drives both once per frame.
///
/// The physics steps on every tick; the other modules refresh only while no vertex is
/// being dragged. The run ends on [`stop`](Self::stop) or once the pipeline's settling
/// metric drops under the graph's `alpha` threshold.
pub struct Session {
	graph: Graph,
	pipeline: LayoutPipeline,
	listeners: HashMap<Lifecycle, Listener>,
	running: bool,
	drag: Option<Drag>,
	frame: u64,
	rendered_size: Option<(f64, f64)>,
}

impl Default for Session {
	fn default() -> Self {
		Self::new(GraphConfig::default())
	}
}

impl fmt::Debug for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session")
			.field("graph", &self.graph)
			.field("layouts", &self.pipeline.names())
			.field("running", &self.running)
			.field("frame", &self.frame)
			.finish_non_exhaustive()
	}
}

impl Session {
	/// Empty session with no layouts.
	pub fn new(config: GraphConfig) -> Self {
		Self {
			graph: Graph::new(config),
			pipeline: LayoutPipeline::default(),
			listeners: HashMap::new(),
			running: false,
			drag: None,
			frame: 0,
			rendered_size: None,
		}
	}

	/// The graph being driven.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Mutable access to the graph.
	pub fn graph_mut(&mut self) -> &mut Graph {
		&mut self.graph
	}

	/// Replaces the active layout modules; they run in the given order.
	pub fn layout(&mut self, layouts: Vec<Box<dyn Layout>>) -> &mut Self {
		self.pipeline.set(layouts);
		self
	}

	/// The active modules.
	pub fn layouts(&self) -> &LayoutPipeline {
		&self.pipeline
	}

	/// First active module of type `T`.
	pub fn find_layout<T: Layout + 'static>(&self) -> Option<&T> {
		self.pipeline.find::<T>()
	}

	/// Registers the listener for one lifecycle notification, replacing the previous one.
	pub fn on(&mut self, lifecycle: Lifecycle, listener: impl Fn(&Graph) + 'static) -> &mut Self {
		self.listeners.insert(lifecycle, Rc::new(listener));
		self
	}

	/// Whether a run is in progress.
	pub fn running(&self) -> bool {
		self.running
	}

	/// The vertex being dragged.
	pub fn dragging(&self) -> Option<VertexId> {
		self.drag.map(|drag| drag.vertex)
	}

	/// Frames ticked since the last start.
	pub fn frame(&self) -> u64 {
		self.frame
	}

	fn dispatch(&self, lifecycle: Lifecycle) {
		if let Some(listener) = self.listeners.get(&lifecycle) {
			listener(&self.graph);
		}
	}

	/// Keeps the drawing anchored on the root when the viewport changed size since the
	/// previous run.
	fn recenter(&mut self) {
		let size = (self.graph.width(), self.graph.height());
		let resized = self.rendered_size.is_some_and(|previous| previous != size);
		self.rendered_size = Some(size);
		if !resized {
			return;
		}
		let Some(root) = self.graph.root().and_then(|id| self.graph.vertex(id)) else {
			return;
		};
		let center = self.graph.center();
		let (dx, dy) = (center.x - root.x, center.y - root.y);
		self.graph.pin_root();
		self.graph.shift(dx, dy);
		debug!("viewport now {}x{}, shifted by ({dx}, {dy})", size.0, size.1);
	}

	/// Starts a fresh run, stopping the current one first.
	pub fn start(&mut self) -> &mut Self {
		self.stop();
		self.recenter();
		self.frame = 0;
		self.running = true;
		self.dispatch(Lifecycle::Start);
		self.pipeline.start(&mut self.graph);
		info!("run started with {} vertices", self.graph.count());
		self
	}

	/// Stops the run; a no-op when not running.
	pub fn stop(&mut self) -> &mut Self {
		if self.running {
			self.pipeline.stop(&mut self.graph);
			self.running = false;
			info!("run stopped after {} frames", self.frame);
		}
		self
	}

	/// Advances the run by one frame of `dt` seconds; returns whether it is still running.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.running {
			return false;
		}
		self.frame += 1;
		self.pipeline.step(&mut self.graph, dt);

		self.dispatch(Lifecycle::Refresh);
		if self.drag.is_none() {
			self.pipeline.refresh(&mut self.graph);
		}
		self.graph.pin_root();

		let threshold = self.graph.config().alpha;
		if threshold > 0.0 {
			if let Some(alpha) = self.pipeline.alpha() {
				if alpha < threshold {
					info!("settled after {} frames", self.frame);
					self.stop();
					self.dispatch(Lifecycle::End);
					self.graph.notify_freeze();
				}
			}
		}
		self.running
	}

	/// Layout-aware envelope of the whole graph.
	pub fn bbox(&self) -> Option<BBox> {
		self.pipeline.bbox(&self.graph)
	}

	/// Layout-aware bounds of one vertex.
	pub fn vertex_bbox(&self, vertex: VertexId) -> Result<BBox> {
		self.pipeline.vertex_bbox(&self.graph, vertex)
	}

	/// Grabs `vertex`: refresh is suspended and the physics leaves it where the pointer puts it.
	pub fn drag_start(&mut self, vertex: VertexId) -> Result<()> {
		self.drag_end_quietly();
		let target = self.graph.require(vertex)?;
		let was_fixed = target.fixed;
		if let Some(target) = self.graph.vertex_mut(vertex) {
			target.fixed = true;
		}
		self.drag = Some(Drag { vertex, was_fixed });
		debug!("dragging {vertex}");
		Ok(())
	}

	/// Moves the dragged vertex, if any.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(drag) = self.drag else {
			return;
		};
		if let Some(vertex) = self.graph.vertex_mut(drag.vertex) {
			vertex.place(x, y);
		}
	}

	/// Releases the dragged vertex and restarts the run so the graph settles around it.
	pub fn drag_end(&mut self) {
		if self.drag_end_quietly() {
			self.start();
		}
	}

	fn drag_end_quietly(&mut self) -> bool {
		let Some(drag) = self.drag.take() else {
			return false;
		};
		if let Some(vertex) = self.graph.vertex_mut(drag.vertex) {
			vertex.fixed = drag.was_fixed;
		}
		true
	}

	/// Replaces the graph's contents with `data`; the run is stopped first.
	pub fn import(&mut self, data: &str, format: Format) -> Result<&mut Self> {
		self.stop();
		self.drag = None;
		self.graph.import(data, format)?;
		Ok(self)
	}

	/// Renders the graph in `format`.
	pub fn export(&self, format: Format) -> Result<String> {
		self.graph.export(format)
	}

	/// Stops the run and empties the graph.
	pub fn clear(&mut self) -> &mut Self {
		self.stop();
		self.drag = None;
		self.graph.clear();
		self
	}
}
