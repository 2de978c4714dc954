//! Directed graph engine: vertex and edge collections, adjacency, mutation and queries.

mod arena;
mod bbox;
mod edge;
mod event;
mod query;
mod vertex;

use std::collections::HashMap;
use std::fmt;

use log::debug;

use self::arena::Arena;
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

pub use bbox::BBox;
pub use edge::{DEFAULT_WEIGHT, Edge, EdgeId, EdgeSpec, Link};
pub use event::{EventHandler, EventKind, Item, ItemEvent, ItemKind};
pub use query::{Direction, Filter};
pub use vertex::{Attributes, DEFAULT_SIZE, Satellite, Vertex, VertexId, VertexSpec};

/// How `connect` and friends find a vertex: an existing handle, or a name/spec
/// that is looked up first and added when missing.
#[derive(Clone, Debug)]
pub enum Endpoint {
	/// A vertex already in the graph.
	Id(VertexId),
	/// Looked up by name, added with defaults when missing.
	Name(String),
	/// Looked up by the spec's name, added from the spec when missing.
	Spec(VertexSpec),
}

impl From<VertexId> for Endpoint {
	fn from(id: VertexId) -> Self {
		Self::Id(id)
	}
}

impl From<&str> for Endpoint {
	fn from(name: &str) -> Self {
		Self::Name(name.to_owned())
	}
}

impl From<String> for Endpoint {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<VertexSpec> for Endpoint {
	fn from(spec: VertexSpec) -> Self {
		Self::Spec(spec)
	}
}

/// A position in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// Owner of all vertices and edges.
///
/// Adjacency is kept symmetric: `t` is among `s`'s successors exactly when `s` is
/// among `t`'s predecessors, exactly when an edge `s -> t` exists.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	vertices: Arena<VertexId, Vertex>,
	edges: Arena<EdgeId, Edge>,
	names: HashMap<String, VertexId>,
	pairs: HashMap<(VertexId, VertexId), EdgeId>,
	root: Option<VertexId>,
	config: GraphConfig,
	handler: Option<EventHandler>,
	next_vertex: u32,
	next_edge: u32,
	revision: u64,
}

impl Graph {
	/// Empty graph with `config`.
	pub fn new(config: GraphConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Settings the graph was built with.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Viewport width.
	pub fn width(&self) -> f64 {
		self.config.width
	}

	/// Viewport height.
	pub fn height(&self) -> f64 {
		self.config.height
	}

	/// Changes the viewport; the root moves on the next session start.
	pub fn resize(&mut self, width: f64, height: f64) -> &mut Self {
		self.config.width = width;
		self.config.height = height;
		self
	}

	/// Center of the viewport.
	pub fn center(&self) -> Point {
		Point {
			x: self.config.width / 2.0,
			y: self.config.height / 2.0,
		}
	}

	/// Configured edge length used for seeding and radial rings.
	pub fn max_edge_length(&self) -> f64 {
		self.config.edge_length
	}

	/// Number of vertices.
	pub fn count(&self) -> usize {
		self.vertices.len()
	}

	/// Bumped on every topology change; lets layouts notice stale caches.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Default handler for items created from now on.
	pub fn set_event_handler(&mut self, handler: Option<EventHandler>) -> &mut Self {
		self.handler = handler;
		self
	}

	/// Handler new items inherit.
	pub fn event_handler(&self) -> Option<&EventHandler> {
		self.handler.as_ref()
	}

	/// Vertices in insertion order.
	pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
		self.vertices.values()
	}

	/// Mutable vertices in insertion order.
	pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
		self.vertices.values_mut()
	}

	/// Handles of all vertices, in insertion order.
	pub fn vertex_ids(&self) -> Vec<VertexId> {
		self.vertices.keys().collect()
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}

	/// The vertex behind `id`, if it is still here.
	pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
		self.vertices.get(id)
	}

	/// Mutable access to the vertex behind `id`.
	pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
		self.vertices.get_mut(id)
	}

	/// The edge behind `id`, if it is still here.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(id)
	}

	pub(crate) fn require(&self, id: VertexId) -> Result<&Vertex> {
		self.vertices.get(id).ok_or(GraphError::UnknownVertex(id))
	}

	/// Position of the vertex in [`Graph::vertices`].
	pub fn index_of(&self, id: VertexId) -> Option<usize> {
		self.vertices.position(id)
	}

	/// Whether `id` names a live vertex.
	pub fn contains(&self, id: VertexId) -> bool {
		self.vertices.contains(id)
	}

	/// Vertex with the given name.
	pub fn get(&self, name: &str) -> Option<VertexId> {
		self.names.get(name).copied()
	}

	/// Edge from `source` to `target`.
	pub fn get_edge(&self, source: VertexId, target: VertexId) -> Option<EdgeId> {
		self.pairs.get(&(source, target)).copied()
	}

	/// Adds a vertex, filling absent fields with defaults; its name must be free.
	pub fn add(&mut self, spec: VertexSpec) -> Result<VertexId> {
		if let Some(name) = spec.name.as_deref().filter(|name| !name.is_empty()) {
			if self.names.contains_key(name) {
				return Err(GraphError::DuplicateName(name.to_owned()));
			}
		}
		let id = VertexId(self.next_vertex);
		self.next_vertex += 1;
		let names = &self.names;
		let fallback = || {
			let mut serial = id.0;
			loop {
				let candidate = format!("vertex-{serial}");
				if !names.contains_key(&candidate) {
					break candidate;
				}
				serial += 1;
			}
		};
		let vertex = Vertex::from_spec(id, spec, fallback, self.handler.clone());
		self.names.insert(vertex.name().to_owned(), id);
		self.vertices.insert(id, vertex);
		self.revision += 1;
		Ok(id)
	}

	/// Finds the endpoint's vertex, adding it when a name or spec is not present yet.
	pub fn resolve(&mut self, endpoint: impl Into<Endpoint>) -> Result<VertexId> {
		match endpoint.into() {
			Endpoint::Id(id) => self.require(id).map(Vertex::id),
			Endpoint::Name(name) => match self.get(&name) {
				Some(id) => Ok(id),
				None => self.add(VertexSpec::named(name)),
			},
			Endpoint::Spec(spec) => {
				match spec.name.as_deref().and_then(|name| self.get(name)) {
					Some(id) => Ok(id),
					None => self.add(spec),
				}
			}
		}
	}

	/// Removes a vertex after disconnecting every edge touching it. Absent vertices are ignored.
	pub fn remove(&mut self, id: VertexId) -> &mut Self {
		let Some(vertex) = self.vertices.get(id) else {
			return self;
		};
		let successors = vertex.successors.clone();
		let predecessors = vertex.predecessors.clone();
		for target in successors {
			self.unlink(id, target);
		}
		for source in predecessors {
			self.unlink(source, id);
		}
		if let Some(vertex) = self.vertices.remove(id) {
			self.names.remove(vertex.name());
			debug!("removed {vertex}");
		}
		if self.root == Some(id) {
			self.root = None;
		}
		self.revision += 1;
		self
	}

	/// Removes each vertex in turn; see [`Graph::remove`].
	pub fn remove_all(&mut self, ids: impl IntoIterator<Item = VertexId>) -> &mut Self {
		for id in ids {
			self.remove(id);
		}
		self
	}

	/// Connects `source -> target` with a default edge; see [`Graph::connect_with`].
	pub fn connect(
		&mut self,
		source: impl Into<Endpoint>,
		target: impl Into<Endpoint>,
	) -> Result<&mut Self> {
		self.connect_with(source, target, EdgeSpec::default())
	}

	/// Connects `source -> target` unless that edge already exists.
	///
	/// A new edge raises the target's level to one past its shallowest predecessor
	/// and seeds the target next to the source.
	pub fn connect_with(
		&mut self,
		source: impl Into<Endpoint>,
		target: impl Into<Endpoint>,
		spec: EdgeSpec,
	) -> Result<&mut Self> {
		let source = self.resolve(source)?;
		let target = self.resolve(target)?;
		if self.connects(source, target, Direction::Forward) {
			return Ok(self);
		}

		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		let edge = Edge::from_spec(
			id,
			spec,
			self.require(source)?,
			self.require(target)?,
			self.handler.clone(),
		);
		debug!("connecting {} -> {}", edge.source(), edge.target());
		self.edges.insert(id, edge);
		self.pairs.insert((source, target), id);

		if let Some(vertex) = self.vertices.get_mut(source) {
			vertex.successors.push(target);
		}
		if let Some(vertex) = self.vertices.get_mut(target) {
			vertex.predecessors.push(source);
		}

		let level = self
			.require(target)?
			.predecessors
			.iter()
			.filter_map(|&id| self.vertices.get(id))
			.map(Vertex::level)
			.min()
			.map_or(0, |level| level + 1);
		if let Some(vertex) = self.vertices.get_mut(target) {
			vertex.level = level;
		}

		self.seed(source, target);
		self.revision += 1;
		Ok(self)
	}

	/// Places a freshly connected target around its source.
	///
	/// Siblings fan out 90° apart starting from the canvas diagonal, at an edge
	/// length divided by the target's level.
	fn seed(&mut self, source: VertexId, target: VertexId) {
		let Some(parent) = self.vertices.get(source) else {
			return;
		};
		let (origin_x, origin_y) = (parent.x, parent.y);
		let siblings = parent.successors.len().max(1) - 1;
		let Some(level) = self.vertices.get(target).map(Vertex::level) else {
			return;
		};

		let slant = (self.config.width / self.config.height).atan().to_degrees();
		let theta = (slant + ((siblings * 90) % 360) as f64).to_radians();
		let distance = self.config.edge_length / f64::from(level.max(1));

		if let Some(vertex) = self.vertices.get_mut(target) {
			vertex.place(
				origin_x + distance * theta.cos(),
				origin_y + distance * theta.sin(),
			);
		}
	}

	/// Drops the edge and both adjacency entries of one pair, if connected.
	fn unlink(&mut self, source: VertexId, target: VertexId) -> bool {
		let Some(edge) = self.pairs.remove(&(source, target)) else {
			return false;
		};
		self.edges.remove(edge);
		if let Some(vertex) = self.vertices.get_mut(source) {
			vertex.successors.retain(|&id| id != target);
		}
		if let Some(vertex) = self.vertices.get_mut(target) {
			vertex.predecessors.retain(|&id| id != source);
		}
		self.revision += 1;
		true
	}

	/// Removes the edges `source -> target` for each target. Missing pairs are skipped.
	pub fn disconnect(
		&mut self,
		source: VertexId,
		targets: impl IntoIterator<Item = VertexId>,
	) -> &mut Self {
		for target in targets {
			if self.unlink(source, target) {
				debug!("disconnected {source} -> {target}");
			}
		}
		self
	}

	/// Removes every edge and empties every adjacency list.
	pub fn disconnect_all(&mut self) -> &mut Self {
		self.edges.clear();
		self.pairs.clear();
		for vertex in self.vertices.values_mut() {
			vertex.successors.clear();
			vertex.predecessors.clear();
		}
		self.revision += 1;
		self
	}

	/// Removes every non-root vertex whose total degree is at most `threshold`.
	///
	/// Degrees are read live, so removing one vertex can make a later one eligible.
	pub fn reduce(&mut self, threshold: usize) -> &mut Self {
		for id in self.vertex_ids() {
			let eligible = self
				.vertices
				.get(id)
				.is_some_and(|vertex| !vertex.root && vertex.degree() <= threshold);
			if eligible {
				self.remove(id);
			}
		}
		self
	}

	/// The current root, if any.
	pub fn root(&self) -> Option<VertexId> {
		self.root
	}

	/// Installs a new root: centered, fixed, and the only vertex flagged as root.
	pub fn set_root(&mut self, endpoint: impl Into<Endpoint>) -> Result<VertexId> {
		let id = self.resolve(endpoint)?;
		self.clear_root();
		let center = self.center();
		if let Some(vertex) = self.vertices.get_mut(id) {
			vertex.place(center.x, center.y);
			vertex.root = true;
			vertex.fixed = true;
		}
		self.root = Some(id);
		self.revision += 1;
		debug!("root is now {id}");
		Ok(id)
	}

	/// Clears the root's `root` and `fixed` flags and forgets it.
	pub fn clear_root(&mut self) -> &mut Self {
		if let Some(previous) = self.root.take() {
			if let Some(vertex) = self.vertices.get_mut(previous) {
				vertex.root = false;
				vertex.fixed = false;
			}
		}
		self
	}

	/// Moves the root back onto the canvas center.
	pub(crate) fn pin_root(&mut self) {
		let center = self.center();
		if let Some(vertex) = self.root.and_then(|id| self.vertices.get_mut(id)) {
			vertex.place(center.x, center.y);
		}
	}

	/// Translates every vertex except the root, current and previous positions alike.
	pub(crate) fn shift(&mut self, dx: f64, dy: f64) {
		for vertex in self.vertices.values_mut().filter(|vertex| !vertex.root) {
			vertex.x += dx;
			vertex.px += dx;
			vertex.y += dy;
			vertex.py += dy;
		}
	}

	/// Replaces all vertices; existing edges go with them.
	pub fn set_vertices(&mut self, specs: impl IntoIterator<Item = VertexSpec>) -> Result<&mut Self> {
		self.clear();
		for spec in specs {
			self.add(spec)?;
		}
		Ok(self)
	}

	/// Replaces all edges, creating missing endpoints.
	pub fn set_edges(&mut self, links: impl IntoIterator<Item = Link>) -> Result<&mut Self> {
		self.disconnect_all();
		for link in links {
			self.connect_with(link.source, link.target, link.spec)?;
		}
		Ok(self)
	}

	/// Removes every vertex and edge and drops the root.
	pub fn clear(&mut self) -> &mut Self {
		self.vertices.clear();
		self.edges.clear();
		self.names.clear();
		self.pairs.clear();
		self.root = None;
		self.revision += 1;
		self
	}

	/// Bounds of one vertex's own shape.
	pub fn vertex_bbox(&self, id: VertexId) -> Result<BBox> {
		self.require(id)
			.map(|vertex| BBox::circle(vertex.x, vertex.y, vertex.size))
	}

	/// Envelope of every vertex shape; `None` for an empty graph.
	pub fn bbox(&self) -> Option<BBox> {
		BBox::envelope(
			self.vertices
				.values()
				.map(|vertex| BBox::circle(vertex.x, vertex.y, vertex.size)),
		)
	}

	/// Every live satellite together with its parent.
	pub fn satellites(&self) -> Vec<(VertexId, &Satellite)> {
		self.vertices
			.values()
			.filter_map(|vertex| vertex.satellite.as_ref().map(|satellite| (vertex.id(), satellite)))
			.collect()
	}

	/// Hands a pointer event to the item's own handler.
	pub fn notify(&self, item: Item, kind: EventKind) {
		let handler = match item {
			Item::Vertex(id) => self.vertices.get(id).and_then(Vertex::handler),
			Item::Edge(id) => self.edges.get(id).and_then(Edge::handler),
		};
		if let Some(handler) = handler {
			handler.call(&ItemEvent {
				kind,
				item: Some(item),
			});
		}
	}

	pub(crate) fn notify_freeze(&self) {
		if let Some(handler) = &self.handler {
			handler.call(&ItemEvent {
				kind: EventKind::Freeze,
				item: None,
			});
		}
	}

	/// `[Edge a → b]`
	pub fn describe_edge(&self, id: EdgeId) -> Option<String> {
		let edge = self.edges.get(id)?;
		let source = self.vertices.get(edge.source())?;
		let target = self.vertices.get(edge.target())?;
		Some(format!("[Edge {} → {}]", source.name(), target.name()))
	}
}

impl fmt::Display for Graph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[Graph: {}x{}, {} vertices]",
			self.config.width,
			self.config.height,
			self.count()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placement_fans_siblings_out_by_quarter_turns() {
		let mut graph = Graph::default();
		let root = graph.set_root("root").unwrap();
		graph.connect(root, "a").unwrap().connect(root, "b").unwrap();

		let center = graph.center();
		let slant = (800.0f64 / 600.0).atan();
		let a = graph.vertex(graph.get("a").unwrap()).unwrap();
		assert!((a.x - (center.x + 15.0 * slant.cos())).abs() < 1e-9);
		assert!((a.y - (center.y + 15.0 * slant.sin())).abs() < 1e-9);
		assert_eq!((a.px, a.py), (a.x, a.y));

		let b = graph.vertex(graph.get("b").unwrap()).unwrap();
		let theta = slant + std::f64::consts::FRAC_PI_2;
		assert!((b.x - (center.x + 15.0 * theta.cos())).abs() < 1e-9);
		assert!((b.y - (center.y + 15.0 * theta.sin())).abs() < 1e-9);
	}

	#[test]
	fn deeper_targets_are_seeded_closer() {
		let mut graph = Graph::default();
		graph.connect("a", "b").unwrap().connect("b", "c").unwrap();
		let b = graph.vertex(graph.get("b").unwrap()).unwrap();
		let c = graph.vertex(graph.get("c").unwrap()).unwrap();
		assert_eq!(c.level(), 2);
		assert!(((c.x - b.x).hypot(c.y - b.y) - 7.5).abs() < 1e-9);
	}

	#[test]
	fn duplicate_names_are_rejected() {
		let mut graph = Graph::default();
		graph.add(VertexSpec::named("a")).unwrap();
		assert!(matches!(
			graph.add(VertexSpec::named("a")),
			Err(GraphError::DuplicateName(name)) if name == "a"
		));
	}

	#[test]
	fn generated_names_skip_taken_ones() {
		let mut graph = Graph::default();
		graph.add(VertexSpec::named("vertex-0")).unwrap();
		let id = graph.add(VertexSpec::default()).unwrap();
		assert_eq!(graph.vertex(id).unwrap().name(), "vertex-1");
	}

	#[test]
	fn stale_handles_are_errors() {
		let mut graph = Graph::default();
		let a = graph.add(VertexSpec::default()).unwrap();
		graph.remove(a);
		assert!(matches!(graph.connect(a, "b"), Err(GraphError::UnknownVertex(id)) if id == a));
		assert!(graph.vertex_bbox(a).is_err());
	}

	#[test]
	fn removing_the_root_forgets_it() {
		let mut graph = Graph::default();
		let root = graph.set_root("r").unwrap();
		graph.remove(root);
		assert_eq!(graph.root(), None);
	}

	#[test]
	fn display_forms() {
		let mut graph = Graph::default();
		graph.connect("a", "b").unwrap();
		assert_eq!(graph.to_string(), "[Graph: 800x600, 2 vertices]");
		let edge = graph.edges().next().unwrap();
		assert_eq!(edge.name(), "a-b");
		assert_eq!(graph.describe_edge(edge.id()).unwrap(), "[Edge a → b]");
	}
}
