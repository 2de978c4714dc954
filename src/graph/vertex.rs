use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EventHandler;

/// User-defined fields carried through untouched.
pub type Attributes = BTreeMap<String, Value>;

/// Radius of a vertex created without one.
pub const DEFAULT_SIZE: f64 = 3.0;

/// Stable handle of a vertex within one graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) u32);

impl fmt::Display for VertexId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "v{}", self.0)
	}
}

/// Raw description of a vertex. Absent fields receive defaults when the vertex is created.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexSpec {
	/// Defaults to a generated unique name.
	pub name: Option<String>,
	/// Horizontal position.
	pub x: Option<f64>,
	/// Vertical position.
	pub y: Option<f64>,
	/// Previous horizontal position; defaults to `x`.
	pub px: Option<f64>,
	/// Previous vertical position; defaults to `y`.
	pub py: Option<f64>,
	/// Radius; defaults to [`DEFAULT_SIZE`].
	pub size: Option<f64>,
	/// Initial level.
	pub level: Option<u32>,
	/// Kept out of physics.
	pub fixed: Option<bool>,
	/// Ask the satellites layout for an auxiliary vertex.
	pub satellite: bool,
	/// User fields.
	#[serde(flatten)]
	pub attributes: Attributes,
}

impl VertexSpec {
	/// Spec with only a name.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			..Self::default()
		}
	}

	/// Sets the position.
	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}

	/// Sets the radius.
	pub fn with_size(mut self, size: f64) -> Self {
		self.size = Some(size);
		self
	}

	/// Asks for a satellite.
	pub fn with_satellite(mut self) -> Self {
		self.satellite = true;
		self
	}

	/// Adds one user field.
	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	/// Fills every absent field with its default. Fields already set are left alone,
	/// so applying this twice changes nothing.
	pub(crate) fn canonicalize(&mut self, fallback_name: impl FnOnce() -> String) {
		if self.name.as_deref().is_none_or(str::is_empty) {
			self.name = Some(fallback_name());
		}
		let x = *self.x.get_or_insert(0.0);
		let y = *self.y.get_or_insert(0.0);
		self.px.get_or_insert(x);
		self.py.get_or_insert(y);
		self.size.get_or_insert(DEFAULT_SIZE);
		self.level.get_or_insert(0);
		self.fixed.get_or_insert(false);
	}
}

impl From<&str> for VertexSpec {
	fn from(name: &str) -> Self {
		Self::named(name)
	}
}

/// Small fixed companion of a vertex, placed by the satellites layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Satellite {
	/// `<parent>-satellite`.
	pub name: String,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Radius.
	pub size: f64,
}

impl Satellite {
	pub(crate) fn of(vertex: &Vertex) -> Self {
		Self {
			name: format!("{}-satellite", vertex.name),
			x: vertex.x,
			y: vertex.y,
			size: vertex.size,
		}
	}
}

/// A vertex owned by a [`Graph`](super::Graph).
#[derive(Clone, Debug)]
pub struct Vertex {
	id: VertexId,
	name: String,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Previous position; equal to the current one means "no velocity yet".
	pub px: f64,
	/// Previous vertical position.
	pub py: f64,
	/// Radius.
	pub size: f64,
	/// Excluded from physics relaxation.
	pub fixed: bool,
	pub(crate) level: u32,
	pub(crate) root: bool,
	pub(crate) predecessors: Vec<VertexId>,
	pub(crate) successors: Vec<VertexId>,
	/// The satellites layout gives this vertex a companion.
	pub carries_satellite: bool,
	/// The companion, once the satellites layout placed it.
	pub satellite: Option<Satellite>,
	/// User fields.
	pub attributes: Attributes,
	pub(crate) handler: Option<EventHandler>,
}

impl Vertex {
	/// Builds the canonical record. A root flag is never taken from a spec.
	pub(crate) fn from_spec(
		id: VertexId,
		mut spec: VertexSpec,
		fallback_name: impl FnOnce() -> String,
		handler: Option<EventHandler>,
	) -> Self {
		spec.canonicalize(fallback_name);
		Self {
			id,
			name: spec.name.unwrap_or_default(),
			x: spec.x.unwrap_or_default(),
			y: spec.y.unwrap_or_default(),
			px: spec.px.unwrap_or_default(),
			py: spec.py.unwrap_or_default(),
			size: spec.size.unwrap_or(DEFAULT_SIZE),
			fixed: spec.fixed.unwrap_or_default(),
			level: spec.level.unwrap_or_default(),
			root: false,
			predecessors: Vec::new(),
			successors: Vec::new(),
			carries_satellite: spec.satellite,
			satellite: None,
			attributes: spec.attributes,
			handler,
		}
	}

	/// Handle of this vertex.
	pub fn id(&self) -> VertexId {
		self.id
	}

	/// Unique name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Distance-from-root hint. Raised on connect, never lowered.
	pub fn level(&self) -> u32 {
		self.level
	}

	/// Whether this is the graph's root.
	pub fn is_root(&self) -> bool {
		self.root
	}

	/// Sources of incoming edges.
	pub fn predecessors(&self) -> &[VertexId] {
		&self.predecessors
	}

	/// Targets of outgoing edges.
	pub fn successors(&self) -> &[VertexId] {
		&self.successors
	}

	/// Incoming plus outgoing edges.
	pub fn degree(&self) -> usize {
		self.predecessors.len() + self.successors.len()
	}

	/// Handler inherited from the graph when the vertex was created.
	pub fn handler(&self) -> Option<&EventHandler> {
		self.handler.as_ref()
	}

	/// Text shown next to the vertex: the `label` attribute, else the name.
	pub fn label(&self) -> &str {
		self.attributes
			.get("label")
			.and_then(Value::as_str)
			.unwrap_or(&self.name)
	}

	pub(crate) fn place(&mut self, x: f64, y: f64) {
		self.x = x;
		self.px = x;
		self.y = y;
		self.py = y;
	}
}

impl fmt::Display for Vertex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[Vertex {}: {} outgoing, {} incoming]",
			self.name,
			self.successors.len(),
			self.predecessors.len()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonicalize_only_fills_gaps() {
		let mut spec = VertexSpec::named("a").at(4.0, 5.0).with_size(9.0);
		spec.canonicalize(|| unreachable!());
		assert_eq!(spec.px, Some(4.0));
		assert_eq!(spec.size, Some(9.0));
		assert_eq!(spec.level, Some(0));

		let before = spec.clone();
		spec.canonicalize(|| "other".into());
		assert_eq!(spec, before);
	}

	#[test]
	fn unnamed_specs_take_the_fallback() {
		let vertex = Vertex::from_spec(VertexId(7), VertexSpec::default(), || "vertex-7".into(), None);
		assert_eq!(vertex.name(), "vertex-7");
		assert_eq!(vertex.size, DEFAULT_SIZE);
		assert!(!vertex.is_root());
		assert_eq!(vertex.to_string(), "[Vertex vertex-7: 0 outgoing, 0 incoming]");
	}

	#[test]
	fn attributes_flatten_from_json() {
		let spec: VertexSpec =
			serde_json::from_str(r#"{ "name": "a", "entityType": "vowel", "satellite": true }"#)
				.unwrap();
		assert!(spec.satellite);
		assert_eq!(spec.attributes["entityType"], "vowel");
	}

	#[test]
	fn label_prefers_the_attribute() {
		let spec = VertexSpec::named("n1").with_attribute("label", "First node");
		let vertex = Vertex::from_spec(VertexId(0), spec, String::new, None);
		assert_eq!(vertex.label(), "First node");
	}
}
