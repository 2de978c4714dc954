use std::any::Any;
use std::collections::HashMap;

use super::{Boundable, Frame, Layout, Refreshable, Startable};
use crate::config::{LabelAlignment, LabelConfig};
use crate::graph::{BBox, Graph, Point, Vertex, VertexId};

/// Breaks `text` at spaces, merging words while a line stays under `max_length` characters.
pub fn wrap(text: &str, max_length: usize) -> Vec<String> {
	let mut lines: Vec<String> = Vec::new();
	for word in text.split(' ') {
		match lines.last_mut() {
			Some(line) if line.chars().count() + word.chars().count() < max_length => {
				line.push(' ');
				line.push_str(word);
			}
			_ => lines.push(word.to_owned()),
		}
	}
	lines
}

/// A placed label: its lines and the text box relative to the vertex center.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBox {
	/// Wrapped text.
	pub lines: Vec<String>,
	/// Offset of the box center from the vertex.
	pub dx: f64,
	/// Vertical offset of the box center.
	pub dy: f64,
	/// Estimated text width.
	pub width: f64,
	/// Estimated text height.
	pub height: f64,
}

/// Puts each vertex's label just outside the vertex, on the side facing away from
/// a reference point, so that the label's bounding ellipse touches the vertex.
#[derive(Clone, Debug, Default)]
pub struct LabelLayout {
	config: LabelConfig,
	labels: HashMap<VertexId, LabelBox>,
}

impl LabelLayout {
	/// Label layout with `config`.
	pub fn new(config: LabelConfig) -> Self {
		Self {
			config,
			labels: HashMap::new(),
		}
	}

	/// Label placed for `vertex` by the last refresh.
	pub fn label(&self, vertex: VertexId) -> Option<&LabelBox> {
		self.labels.get(&vertex)
	}

	fn reference(&self, graph: &Graph, vertex: &Vertex) -> Point {
		let parent = match self.config.alignment {
			LabelAlignment::Parent => vertex.predecessors().first().copied(),
			LabelAlignment::Origin => None,
		};
		parent
			.or(graph.root())
			.and_then(|id| graph.vertex(id))
			.map(|origin| Point {
				x: origin.x,
				y: origin.y,
			})
			.unwrap_or_else(|| graph.center())
	}

	fn measure(&self, vertex: &Vertex) -> (Vec<String>, f64, f64) {
		let lines = wrap(vertex.label(), self.config.max_length);
		let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
		let width = longest as f64 * self.config.glyph_width;
		let height = lines.len() as f64 * self.config.line_height;
		(lines, width, height)
	}

	fn place(&self, graph: &Graph, vertex: &Vertex) -> LabelBox {
		let (lines, width, height) = self.measure(vertex);
		let half_width = width / 2.0 + self.config.offset_x;
		let half_height = height / 2.0 + self.config.offset_y;

		let origin = self.reference(graph, vertex);
		let (dx, dy) = (origin.x - vertex.x, origin.y - vertex.y);
		let slope = if dx != 0.0 {
			dy / dx
		} else if dy > 0.0 {
			half_height
		} else {
			-half_height
		};
		let signum = if dx < 0.0 { 1.0 } else { -1.0 };

		// Point of the label ellipse on the line through the reference point.
		let x = half_width * half_height
			/ (half_height.powi(2) + half_width.powi(2) * slope.powi(2)).sqrt()
			* signum;
		let y = if dx == 0.0 && dy == 0.0 {
			-half_height
		} else {
			x * slope
		};

		let length = x.hypot(y);
		let (ux, uy) = if length > 0.0 {
			(x / length, y / length)
		} else {
			(0.0, -1.0)
		};
		let (cx, cy) = (x + ux * vertex.size, y + uy * vertex.size);

		LabelBox {
			lines,
			dx: cx - half_width + self.config.offset_x,
			dy: cy - half_height + self.config.offset_y,
			width,
			height,
		}
	}

	fn place_all(&mut self, graph: &Graph) {
		self.labels = graph
			.vertices()
			.map(|vertex| (vertex.id(), self.place(graph, vertex)))
			.collect();
	}
}

impl Startable for LabelLayout {
	fn start(&mut self, graph: &mut Graph) {
		self.place_all(graph);
	}
}

impl Refreshable for LabelLayout {
	fn refresh(&mut self, frame: &mut Frame<'_>) {
		self.place_all(&*frame.graph);
	}
}

impl Boundable for LabelLayout {
	fn bbox(&self, graph: &Graph, vertex: VertexId) -> Option<BBox> {
		let label = self.labels.get(&vertex)?;
		let vertex = graph.vertex(vertex)?;
		let (left, top) = (vertex.x + label.dx, vertex.y + label.dy);
		Some(BBox::new(left, top, left + label.width, top + label.height))
	}
}

impl Layout for LabelLayout {
	fn name(&self) -> &str {
		"labels"
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

	fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
		Some(self)
	}

	fn as_boundable(&self) -> Option<&dyn Boundable> {
		Some(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::VertexSpec;

	#[test]
	fn wrap_merges_short_words() {
		assert_eq!(wrap("a b c", 18), vec!["a b c"]);
		assert_eq!(
			wrap("International Business Machines", 18),
			vec!["International", "Business Machines"]
		);
		assert_eq!(wrap("", 18), vec![""]);
	}

	#[test]
	fn labels_face_away_from_the_parent() {
		let mut graph = Graph::default();
		graph.add(VertexSpec::named("p").at(100.0, 100.0)).unwrap();
		graph.connect("p", "child").unwrap();
		let child = graph.get("child").unwrap();
		graph.vertex_mut(child).unwrap().place(200.0, 100.0);

		let mut layout = LabelLayout::new(LabelConfig::default());
		layout.start(&mut graph);
		let label = layout.label(child).unwrap();

		// Parent straight to the left: the label box starts right of the vertex.
		let (left, top) = (label.dx, label.dy);
		assert!(left > 0.0);
		assert!((top + label.height / 2.0).abs() < 1e-9);
		// Its padded ellipse touches the vertex boundary.
		let half_width = label.width / 2.0 + 5.0;
		assert!((left - 5.0 + half_width - (half_width + 3.0)).abs() < 1e-9);

		let bbox = layout.bbox(&graph, child).unwrap();
		assert_eq!(bbox.left, 200.0 + left);
	}
}
