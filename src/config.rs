//! Serde-backed configuration for the graph and its layouts.
//!
//! Every field has a default, so partial JSON documents are accepted:
//!
//! ```
//! let config = graph_stage::GraphConfig::from_json(r#"{ "width": 1024 }"#).unwrap();
//! assert_eq!(config.width, 1024.0);
//! assert_eq!(config.height, 600.0);
//! ```

use force_graph::SimulationParameters;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Viewport and run-loop settings of a graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Viewport width in pixels.
	pub width: f64,
	/// Viewport height in pixels.
	pub height: f64,
	/// Edge length used to seed new vertices and to size radial rings.
	pub edge_length: f64,
	/// Settling threshold. The run stops once the compound alpha drops below it; zero disables that.
	pub alpha: f64,
	/// Draw arrowheads at edge targets.
	pub arrows: bool,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			edge_length: 15.0,
			alpha: 0.01,
			arrows: false,
		}
	}
}

impl GraphConfig {
	/// Parses a possibly partial JSON document.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

/// Physics engine parameters plus the settling schedule of the force layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Repulsion between every pair of vertices.
	pub charge: f32,
	/// Stiffness of edges.
	pub spring: f32,
	/// Cap on the force applied to one vertex per step.
	pub max_force: f32,
	/// Velocity scale of the integrator.
	pub node_speed: f32,
	/// Velocity kept from one step to the next.
	pub damping: f32,
	/// Mass given to every simulated vertex.
	pub mass: f32,
	/// Alpha right after `start`.
	pub initial_alpha: f64,
	/// Factor applied to alpha on every physics step.
	pub alpha_decay: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			mass: 10.0,
			initial_alpha: 0.1,
			alpha_decay: 0.99,
		}
	}
}

impl ForceConfig {
	pub(crate) fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.charge,
			force_spring: self.spring,
			force_max: self.max_force,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}

/// Zoom-to-fit behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	/// Margin around the bounding box, as a fraction of its extent.
	pub margin: f64,
	/// Lowest scale the fit commits.
	pub min_scale: f64,
	/// Highest scale the fit commits; wins over `min_scale` when the two cross.
	pub max_scale: f64,
	/// Relative scale change below which a new transform is not committed.
	pub tolerance: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			margin: 0.05,
			min_scale: 1.0,
			max_scale: 4.0,
			tolerance: 0.01,
		}
	}
}

/// Canvas insets a satellite keeps to, and its gap to the parent vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
	/// Inset from the left canvas edge.
	pub left: f64,
	/// Inset from the right canvas edge.
	pub right: f64,
	/// Inset from the top canvas edge.
	pub top: f64,
	/// Inset from the bottom canvas edge.
	pub bottom: f64,
	/// Space between a satellite and its parent.
	pub gap: f64,
}

impl Default for SatelliteConfig {
	fn default() -> Self {
		Self {
			left: 10.0,
			right: 50.0,
			top: 10.0,
			bottom: 20.0,
			gap: 2.0,
		}
	}
}

/// Where a label looks from when it is pushed off its vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlignment {
	/// Away from the first predecessor, falling back to the origin.
	#[default]
	Parent,
	/// Away from the root, or the canvas center when there is none.
	Origin,
}

/// Label placement and text metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
	/// Which point labels turn away from.
	pub alignment: LabelAlignment,
	/// Height of one wrapped line.
	pub line_height: f64,
	/// Words are merged onto one line while it stays shorter than this.
	pub max_length: usize,
	/// Estimated width of one character.
	pub glyph_width: f64,
	/// Extra distance between vertex and label.
	pub offset_x: f64,
	/// Extra vertical distance between vertex and label.
	pub offset_y: f64,
}

impl Default for LabelConfig {
	fn default() -> Self {
		Self {
			alignment: LabelAlignment::Parent,
			line_height: 13.0,
			max_length: 18,
			glyph_width: 7.0,
			offset_x: 5.0,
			offset_y: 5.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_documents_keep_defaults() {
		let config = GraphConfig::from_json(r#"{ "edge_length": 30, "alpha": 0 }"#).unwrap();
		assert_eq!(config.edge_length, 30.0);
		assert_eq!(config.alpha, 0.0);
		assert_eq!(config.width, 800.0);
		assert!(!config.arrows);
	}

	#[test]
	fn malformed_documents_are_rejected() {
		assert!(GraphConfig::from_json("{ width: }").is_err());
	}

	#[test]
	fn label_alignment_is_lowercase() {
		let config: LabelConfig = serde_json::from_str(r#"{ "alignment": "origin" }"#).unwrap();
		assert_eq!(config.alignment, LabelAlignment::Origin);
		assert_eq!(config.max_length, 18);
	}
}
