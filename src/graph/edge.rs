use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Attributes, Endpoint, EventHandler, Vertex, VertexId};

/// Weight of an edge created without one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Stable handle of an edge within one graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

/// Raw description of an edge. Absent fields receive defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSpec {
	/// Defaults to `"source → target"`.
	pub name: Option<String>,
	/// Defaults to [`DEFAULT_WEIGHT`].
	pub weight: Option<f64>,
	/// User fields.
	#[serde(flatten)]
	pub attributes: Attributes,
}

impl EdgeSpec {
	/// Spec with only a weight.
	pub fn weighted(weight: f64) -> Self {
		Self {
			weight: Some(weight),
			..Self::default()
		}
	}
}

/// An edge to create between two endpoints, resolved when it is connected.
#[derive(Clone, Debug)]
pub struct Link {
	/// Where the edge starts.
	pub source: Endpoint,
	/// Where the edge ends.
	pub target: Endpoint,
	/// Fields of the edge to create.
	pub spec: EdgeSpec,
}

impl Link {
	/// Link with a default edge spec.
	pub fn new(source: impl Into<Endpoint>, target: impl Into<Endpoint>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			spec: EdgeSpec::default(),
		}
	}

	/// Replaces the edge spec.
	pub fn with_spec(mut self, spec: EdgeSpec) -> Self {
		self.spec = spec;
		self
	}
}

/// A directed connection owned by a [`Graph`](super::Graph).
#[derive(Clone, Debug)]
pub struct Edge {
	id: EdgeId,
	name: String,
	source: VertexId,
	target: VertexId,
	/// Strength used by weighted layouts and written to Pajek.
	pub weight: f64,
	/// User fields.
	pub attributes: Attributes,
	pub(crate) handler: Option<EventHandler>,
}

impl Edge {
	pub(crate) fn from_spec(
		id: EdgeId,
		spec: EdgeSpec,
		source: &Vertex,
		target: &Vertex,
		handler: Option<EventHandler>,
	) -> Self {
		let name = spec
			.name
			.filter(|name| !name.is_empty())
			.unwrap_or_else(|| format!("{}-{}", source.name(), target.name()));
		Self {
			id,
			name,
			source: source.id(),
			target: target.id(),
			weight: spec.weight.unwrap_or(DEFAULT_WEIGHT),
			attributes: spec.attributes,
			handler,
		}
	}

	/// Handle of this edge.
	pub fn id(&self) -> EdgeId {
		self.id
	}

	/// Name given at creation.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Vertex the edge leaves.
	pub fn source(&self) -> VertexId {
		self.source
	}

	/// Vertex the edge enters.
	pub fn target(&self) -> VertexId {
		self.target
	}

	/// Handler inherited from the graph when the edge was created.
	pub fn handler(&self) -> Option<&EventHandler> {
		self.handler.as_ref()
	}
}
