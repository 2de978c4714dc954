//! Interchange formats: Pajek and GraphViz DOT.
//!
//! Readers produce a detached [`Network`]; [`Graph::import`] then replaces the graph's
//! contents with it. Writers read the graph directly.

mod dot;
mod pajek;

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::error::{GraphError, Result};
use crate::graph::{EdgeSpec, Graph, Link, VertexSpec};

/// Interchange format token; parses from `"pajek"`/`"net"` and `"dot"`/`"gv"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
	/// Pajek `.net`: `*Vertices` then `*Edges`/`*Arcs`.
	#[default]
	Pajek,
	/// GraphViz DOT, digraphs only.
	Dot,
}

impl Format {
	/// Canonical token.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pajek => "pajek",
			Self::Dot => "dot",
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Format {
	type Err = GraphError;

	fn from_str(token: &str) -> Result<Self> {
		match token.trim().to_ascii_lowercase().as_str() {
			"pajek" | "net" => Ok(Self::Pajek),
			"dot" | "gv" => Ok(Self::Dot),
			_ => Err(GraphError::UnknownFormat(token.to_owned())),
		}
	}
}

/// An edge of a [`Network`], its endpoints given as indices into `vertices`.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEdge {
	/// Index of the source vertex.
	pub source: usize,
	/// Index of the target vertex.
	pub target: usize,
	/// Weight and attributes read with the edge.
	pub spec: EdgeSpec,
}

/// Vertices and edges read from interchange text, not attached to any graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Network {
	/// Vertices in file order.
	pub vertices: Vec<VertexSpec>,
	/// Edges in file order.
	pub edges: Vec<NetworkEdge>,
}

impl Network {
	/// Name of the vertex at `index`, if it has one.
	pub fn name(&self, index: usize) -> Option<&str> {
		self.vertices.get(index)?.name.as_deref()
	}
}

/// Parses `data` without touching any graph.
pub fn read(format: Format, data: &str) -> Result<Network> {
	match format {
		Format::Pajek => pajek::read(data),
		Format::Dot => dot::read(data),
	}
}

/// Renders `graph` in `format`.
pub fn write(format: Format, graph: &Graph) -> Result<String> {
	match format {
		Format::Pajek => Ok(pajek::write(graph)),
		Format::Dot => dot::write(graph),
	}
}

impl Graph {
	/// Replaces every vertex and edge with the contents of `data`.
	///
	/// Coordinates given in the text win over the placement `connect` seeds, so an
	/// exported graph reads back where it was.
	pub fn import(&mut self, data: &str, format: Format) -> Result<&mut Self> {
		let network = read(format, data)?;
		let positions: Vec<_> = network.vertices.iter().map(|spec| (spec.x, spec.y)).collect();

		// Built on a copy so a failure halfway leaves this graph as it was.
		let mut staged = self.clone();
		staged.set_vertices(network.vertices)?;
		let ids = staged.vertex_ids();
		let links = network
			.edges
			.into_iter()
			.filter_map(|edge| {
				let source = *ids.get(edge.source)?;
				let target = *ids.get(edge.target)?;
				Some(Link::new(source, target).with_spec(edge.spec))
			})
			.collect::<Vec<_>>();
		staged.set_edges(links)?;

		for (id, position) in ids.into_iter().zip(positions) {
			if let (Some(vertex), (Some(x), Some(y))) = (staged.vertex_mut(id), position) {
				vertex.place(x, y);
			}
		}
		*self = staged;
		info!("imported {} vertices from {format}", self.count());
		Ok(self)
	}

	/// Renders this graph in `format`.
	pub fn export(&self, format: Format) -> Result<String> {
		write(format, self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn format_tokens() {
		assert_eq!("pajek".parse::<Format>().unwrap(), Format::Pajek);
		assert_eq!("DOT".parse::<Format>().unwrap(), Format::Dot);
		let error = "graphml".parse::<Format>().unwrap_err();
		assert!(matches!(error, GraphError::UnknownFormat(ref token) if token == "graphml"));
		assert!(error.to_string().contains("graphml"));
	}

	#[test]
	fn import_replaces_the_graph() {
		let mut graph = Graph::default();
		graph.connect("old", "older").unwrap();
		graph
			.import("*Vertices 2\n1 \"a\" 10 20 4\n2 \"b\" 30 40 5\n\n*Edges\n1 1 2 2\n", Format::Pajek)
			.unwrap();

		assert_eq!(graph.count(), 2);
		assert!(graph.get("old").is_none());
		let a = graph.get("a").unwrap();
		let b = graph.get("b").unwrap();
		let b_vertex = graph.vertex(b).unwrap();
		assert_eq!((b_vertex.x, b_vertex.y, b_vertex.size), (30.0, 40.0, 5.0));
		assert_eq!(b_vertex.predecessors(), &[a]);
		let edge = graph.get_edge(a, b).unwrap();
		assert_eq!(graph.edge(edge).unwrap().weight, 2.0);
	}
}
