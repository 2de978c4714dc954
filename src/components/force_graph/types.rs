use crate::config::{ForceConfig, GraphConfig, LabelConfig, SatelliteConfig, ZoomConfig};
use crate::error::Result;
use crate::graph::VertexSpec;
use crate::layouts::{ForceLayout, LabelLayout, Layout, RadialLayout, SatelliteLayout, ZoomLayout};
use crate::session::Session;

/// A vertex as handed to the canvas.
#[derive(Clone, Debug)]
pub struct GraphNode {
	/// Unique id, used as the vertex name.
	pub id: String,
	/// Text drawn instead of the id.
	pub label: Option<String>,
	/// CSS color; falls back to the group palette.
	pub color: Option<String>,
	/// Palette index.
	pub group: Option<u32>,
	/// Ask for a satellite.
	pub satellite: bool,
}

/// A directed link between two node ids.
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
}

/// Nodes and links the canvas turns into a session.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	/// Nodes in order.
	pub nodes: Vec<GraphNode>,
	/// Links in order.
	pub links: Vec<GraphLink>,
	/// Id of the node pinned to the center.
	pub root: Option<String>,
}

impl GraphNode {
	fn spec(&self) -> VertexSpec {
		let mut spec = VertexSpec::named(&self.id);
		spec.satellite = self.satellite;
		if let Some(label) = &self.label {
			spec = spec.with_attribute("label", label.as_str());
		}
		if let Some(color) = &self.color {
			spec = spec.with_attribute("color", color.as_str());
		}
		if let Some(group) = self.group {
			spec = spec.with_attribute("group", group);
		}
		spec
	}
}

/// Every layout the canvas runs, in refresh order: physics, then the constraints that
/// correct it, then the view fit that reads the final geometry.
pub fn canvas_layouts() -> Vec<Box<dyn Layout>> {
	vec![
		Box::new(ForceLayout::new(ForceConfig::default())),
		Box::new(RadialLayout::new()),
		Box::new(SatelliteLayout::new(SatelliteConfig::default())),
		Box::new(LabelLayout::new(LabelConfig::default())),
		Box::new(ZoomLayout::new(ZoomConfig::default())),
	]
}

impl GraphData {
	/// Builds a ready-to-start session: root first, so links fan out from the center.
	pub fn session(&self, width: f64, height: f64) -> Result<Session> {
		let mut session = Session::new(GraphConfig {
			width,
			height,
			..GraphConfig::default()
		});
		let graph = session.graph_mut();
		for node in &self.nodes {
			graph.add(node.spec())?;
		}
		if let Some(root) = &self.root {
			graph.set_root(root.as_str())?;
		}
		for link in &self.links {
			graph.connect(link.source.as_str(), link.target.as_str())?;
		}
		session.layout(canvas_layouts());
		Ok(session)
	}
}
