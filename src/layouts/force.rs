use std::any::Any;
use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData};
use log::debug;

use super::{Integrator, Layout, SettlingSource, Startable};
use crate::config::ForceConfig;
use crate::graph::{Graph, VertexId};

/// Drives the physics engine with the graph's vertices and edges.
///
/// The engine is rebuilt whenever the graph's topology changed since the last
/// step. Fixed vertices and the root become anchors the engine never moves.
pub struct ForceLayout {
	config: ForceConfig,
	engine: ForceGraph<VertexId, ()>,
	revision: Option<u64>,
	alpha: f64,
}

impl ForceLayout {
	/// Force layout with `config`.
	pub fn new(config: ForceConfig) -> Self {
		let engine = ForceGraph::new(config.simulation_parameters());
		Self {
			config,
			engine,
			revision: None,
			alpha: 0.0,
		}
	}

	fn rebuild(&mut self, graph: &Graph) {
		self.engine = ForceGraph::new(self.config.simulation_parameters());
		let mut nodes = HashMap::new();
		for vertex in graph.vertices() {
			let node = self.engine.add_node(NodeData {
				x: vertex.x as f32,
				y: vertex.y as f32,
				mass: self.config.mass,
				is_anchor: vertex.fixed || vertex.is_root(),
				user_data: vertex.id(),
			});
			nodes.insert(vertex.id(), node);
		}
		for edge in graph.edges().filter(|edge| edge.source() != edge.target()) {
			if let (Some(&source), Some(&target)) =
				(nodes.get(&edge.source()), nodes.get(&edge.target()))
			{
				self.engine.add_edge(source, target, EdgeData::default());
			}
		}
		self.revision = Some(graph.revision());
		debug!("physics rebuilt with {} vertices", nodes.len());
	}
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self::new(ForceConfig::default())
	}
}

impl Startable for ForceLayout {
	fn start(&mut self, graph: &mut Graph) {
		self.rebuild(graph);
		self.alpha = self.config.initial_alpha;
	}

	fn stop(&mut self, _graph: &mut Graph) {
		self.alpha = 0.0;
	}
}

impl Integrator for ForceLayout {
	fn step(&mut self, graph: &mut Graph, dt: f32) {
		if self.revision != Some(graph.revision()) {
			self.rebuild(graph);
		}

		// Constraint layouts and drags move vertices between steps; feed those positions back in.
		let current: HashMap<VertexId, (f32, f32, bool)> = graph
			.vertices()
			.map(|vertex| {
				let anchored = vertex.fixed || vertex.is_root();
				(vertex.id(), (vertex.x as f32, vertex.y as f32, anchored))
			})
			.collect();
		self.engine.visit_nodes_mut(|node| {
			if let Some(&(x, y, anchored)) = current.get(&node.data.user_data) {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = anchored;
			}
		});

		self.engine.update(dt);

		let mut moved = Vec::new();
		self.engine.visit_nodes(|node| {
			if !node.data.is_anchor {
				moved.push((node.data.user_data, node.x(), node.y()));
			}
		});
		for (id, x, y) in moved {
			if let Some(vertex) = graph.vertex_mut(id) {
				vertex.px = vertex.x;
				vertex.py = vertex.y;
				vertex.x = f64::from(x);
				vertex.y = f64::from(y);
			}
		}

		self.alpha *= self.config.alpha_decay;
	}
}

impl SettlingSource for ForceLayout {
	fn alpha(&self) -> f64 {
		self.alpha
	}
}

impl Layout for ForceLayout {
	fn name(&self) -> &str {
		"force"
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

	fn as_integrator(&mut self) -> Option<&mut dyn Integrator> {
		Some(self)
	}

	fn as_settling_source(&self) -> Option<&dyn SettlingSource> {
		Some(self)
	}
}
