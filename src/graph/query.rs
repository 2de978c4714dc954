use std::collections::HashSet;

use serde_json::Value;

use super::{Attributes, Edge, Graph, Item, ItemKind, Vertex, VertexId};
use crate::error::Result;

/// Which edges `connects` accepts between two vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
	/// Only `source -> target`.
	#[default]
	Forward,
	/// Either direction.
	Any,
	/// Both directions.
	Both,
}

/// Selection criteria for [`Graph::filter`].
///
/// Only set fields take part in matching. As with attribute values, `false`, zero
/// and empty strings count as unset.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
	/// Vertices or edges.
	pub kind: ItemKind,
	/// Exact name.
	pub name: Option<String>,
	/// Vertex level.
	pub level: Option<u32>,
	/// Vertex radius.
	pub size: Option<f64>,
	/// Only fixed vertices.
	pub fixed: bool,
	/// Only the root.
	pub root: bool,
	/// Vertices asking for a satellite.
	pub satellite: bool,
	/// Edge source.
	pub source: Option<VertexId>,
	/// Edge target.
	pub target: Option<VertexId>,
	/// Edge weight.
	pub weight: Option<f64>,
	/// Attribute values to match; falsy values match anything.
	pub attributes: Attributes,
}

impl Filter {
	fn of(kind: ItemKind) -> Self {
		Self {
			kind,
			name: None,
			level: None,
			size: None,
			fixed: false,
			root: false,
			satellite: false,
			source: None,
			target: None,
			weight: None,
			attributes: Attributes::new(),
		}
	}

	/// Matches every vertex until narrowed.
	pub fn vertices() -> Self {
		Self::of(ItemKind::Vertex)
	}

	/// Matches every edge until narrowed.
	pub fn edges() -> Self {
		Self::of(ItemKind::Edge)
	}

	/// Narrows to one name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Narrows to one level.
	pub fn level(mut self, level: u32) -> Self {
		self.level = Some(level);
		self
	}

	/// Narrows to one vertex size.
	pub fn size(mut self, size: f64) -> Self {
		self.size = Some(size);
		self
	}

	/// Narrows to fixed vertices.
	pub fn fixed(mut self) -> Self {
		self.fixed = true;
		self
	}

	/// Narrows to the root.
	pub fn root(mut self) -> Self {
		self.root = true;
		self
	}

	/// Narrows to vertices asking for a satellite.
	pub fn satellite(mut self) -> Self {
		self.satellite = true;
		self
	}

	/// Narrows to one edge weight.
	pub fn weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}

	/// Narrows to edges leaving `source`.
	pub fn source(mut self, source: VertexId) -> Self {
		self.source = Some(source);
		self
	}

	/// Narrows to edges entering `target`.
	pub fn target(mut self, target: VertexId) -> Self {
		self.target = Some(target);
		self
	}

	/// Requires attribute `key` to equal `value`.
	pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	fn name_matches(&self, name: &str) -> bool {
		self.name
			.as_deref()
			.is_none_or(|wanted| wanted.is_empty() || wanted == name)
	}

	fn attributes_match(&self, attributes: &Attributes) -> bool {
		self.attributes
			.iter()
			.filter(|(_, wanted)| truthy(wanted))
			.all(|(key, wanted)| attributes.get(key) == Some(wanted))
	}

	fn wants_vertex_fields(&self) -> bool {
		self.level.is_some_and(|level| level != 0)
			|| self.size.is_some_and(|size| size != 0.0)
			|| self.fixed
			|| self.root
			|| self.satellite
	}

	fn wants_edge_fields(&self) -> bool {
		self.source.is_some() || self.target.is_some() || self.weight.is_some_and(|w| w != 0.0)
	}

	fn matches_vertex(&self, vertex: &Vertex) -> bool {
		!self.wants_edge_fields()
			&& self.name_matches(vertex.name())
			&& self.level.is_none_or(|level| level == 0 || level == vertex.level())
			&& self.size.is_none_or(|size| size == 0.0 || size == vertex.size)
			&& (!self.fixed || vertex.fixed)
			&& (!self.root || vertex.is_root())
			&& (!self.satellite || vertex.carries_satellite)
			&& self.attributes_match(&vertex.attributes)
	}

	fn matches_edge(&self, edge: &Edge) -> bool {
		!self.wants_vertex_fields()
			&& self.name_matches(edge.name())
			&& self.source.is_none_or(|source| source == edge.source())
			&& self.target.is_none_or(|target| target == edge.target())
			&& self.weight.is_none_or(|weight| weight == 0.0 || weight == edge.weight)
			&& self.attributes_match(&edge.attributes)
	}
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

#[derive(Clone, Copy)]
enum Side {
	Predecessors,
	Successors,
}

impl Graph {
	/// Whether an edge joins the two vertices in `direction`.
	pub fn connects(&self, source: VertexId, target: VertexId, direction: Direction) -> bool {
		let forward = self.pairs.contains_key(&(source, target));
		match direction {
			Direction::Forward => forward,
			Direction::Any => forward || self.pairs.contains_key(&(target, source)),
			Direction::Both => forward && self.pairs.contains_key(&(target, source)),
		}
	}

	/// Every item of the filter's kind matching all of its set fields, in collection order.
	pub fn filter(&self, filter: &Filter) -> Vec<Item> {
		match filter.kind {
			ItemKind::Vertex => self
				.vertices()
				.filter(|vertex| filter.matches_vertex(vertex))
				.map(|vertex| Item::Vertex(vertex.id()))
				.collect(),
			ItemKind::Edge => self
				.edges()
				.filter(|edge| filter.matches_edge(edge))
				.map(|edge| Item::Edge(edge.id()))
				.collect(),
		}
	}

	/// Vertices reachable along outgoing edges, limited by `depth` (`None` is unlimited).
	///
	/// The walk is depth-first with one visited set for the whole call. `depth` is
	/// spent once per newly discovered vertex, so siblings share the budget of their
	/// parent's call and a vertex is recorded at the first depth it is reached, which
	/// need not be its shortest distance.
	pub fn successors(&self, id: VertexId, depth: Option<u32>) -> Result<Vec<VertexId>> {
		self.reach(id, depth, Side::Successors)
	}

	/// Mirror of [`Graph::successors`] along incoming edges.
	pub fn predecessors(&self, id: VertexId, depth: Option<u32>) -> Result<Vec<VertexId>> {
		self.reach(id, depth, Side::Predecessors)
	}

	fn reach(&self, id: VertexId, depth: Option<u32>, side: Side) -> Result<Vec<VertexId>> {
		self.require(id)?;
		let depth = depth.map_or(f64::INFINITY, f64::from);
		let mut visited = HashSet::new();
		let mut result = Vec::new();
		self.walk(id, depth, side, &mut visited, &mut result);
		Ok(result)
	}

	fn walk(
		&self,
		id: VertexId,
		mut depth: f64,
		side: Side,
		visited: &mut HashSet<VertexId>,
		result: &mut Vec<VertexId>,
	) {
		let Some(vertex) = self.vertex(id) else {
			return;
		};
		let neighbours = match side {
			Side::Predecessors => vertex.predecessors(),
			Side::Successors => vertex.successors(),
		};
		for &next in neighbours {
			if visited.insert(next) {
				result.push(next);
				depth -= 1.0;
				if depth > 0.0 {
					self.walk(next, depth, side, visited, result);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::VertexSpec;

	fn alphabet() -> Graph {
		let mut graph = Graph::default();
		let spec = |name: &str, kind: &str| VertexSpec::named(name).with_attribute("entityType", kind);
		graph
			.connect(spec("a", "vowel"), spec("b", "consonant"))
			.unwrap()
			.connect("a", spec("c", "consonant"))
			.unwrap()
			.connect("b", spec("e", "vowel"))
			.unwrap()
			.connect("b", spec("ü", "umlaut"))
			.unwrap();
		graph
	}

	#[test]
	fn filter_by_kind_name_and_attribute() {
		let graph = alphabet();
		assert_eq!(graph.filter(&Filter::vertices()).len(), 5);
		assert_eq!(graph.filter(&Filter::edges()).len(), 4);

		let b = graph.get("b").unwrap();
		assert_eq!(graph.filter(&Filter::vertices().name("b")), vec![Item::Vertex(b)]);
		assert_eq!(graph.successors(b, None).unwrap().len(), 2);

		let consonants = Filter::vertices().attribute("entityType", "consonant");
		assert_eq!(graph.filter(&consonants).len(), 2);
	}

	#[test]
	fn falsy_criteria_are_wildcards() {
		let graph = alphabet();
		let filter = Filter::vertices()
			.name("")
			.level(0)
			.attribute("entityType", Value::Null);
		assert_eq!(graph.filter(&filter).len(), 5);
	}

	#[test]
	fn edge_filters_ignore_vertices_and_vice_versa() {
		let graph = alphabet();
		let a = graph.get("a").unwrap();
		assert_eq!(graph.filter(&Filter::edges().source(a)).len(), 2);
		assert!(graph.filter(&Filter::vertices().source(a)).is_empty());
		assert!(graph.filter(&Filter::edges().level(1)).is_empty());
	}

	#[test]
	fn depth_budget_is_shared_by_siblings() {
		let graph = alphabet();
		let a = graph.get("a").unwrap();
		// b spends the only unit, so nothing below b is visited.
		assert_eq!(graph.successors(a, Some(1)).unwrap().len(), 2);
		assert_eq!(graph.successors(a, Some(2)).unwrap().len(), 4);
	}
}
