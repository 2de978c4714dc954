use std::fmt::Write as _;

use log::debug;

use super::{Network, NetworkEdge};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeSpec, Graph, VertexSpec};

const FORMAT: &str = "pajek";

#[derive(Clone, Copy, PartialEq)]
enum Section {
	Vertices,
	Edges,
	Other,
}

fn quote(name: &str) -> String {
	let mut quoted = String::with_capacity(name.len() + 2);
	quoted.push('"');
	for c in name.chars() {
		match c {
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'"' | '\'' | '\\' => {
				quoted.push('\\');
				quoted.push(c);
			}
			_ => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}

/// Splits a leading, possibly quoted, name off `rest`.
fn take_name(rest: &str, line: usize) -> Result<(String, &str)> {
	let rest = rest.trim_start();
	let Some(quoted) = rest.strip_prefix('"') else {
		let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
		return Ok((rest[..end].to_owned(), &rest[end..]));
	};
	let mut name = String::new();
	let mut chars = quoted.char_indices();
	while let Some((index, c)) = chars.next() {
		match c {
			'\\' => match chars.next() {
				Some((_, 'n')) => name.push('\n'),
				Some((_, 'r')) => name.push('\r'),
				Some((_, escaped)) => name.push(escaped),
				None => {}
			},
			'"' => return Ok((name, &quoted[index + 1..])),
			_ => name.push(c),
		}
	}
	Err(GraphError::parse(FORMAT, line, "unterminated vertex name"))
}

fn number<T: std::str::FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<Option<T>> {
	token
		.map(|token| {
			token
				.parse()
				.map_err(|_| GraphError::parse(FORMAT, line, format!("{what} {token:?} is not a number")))
		})
		.transpose()
}

fn vertex(rest: &str, line: usize) -> Result<VertexSpec> {
	let (name, rest) = take_name(rest, line)?;
	let mut columns = rest.split_whitespace();
	Ok(VertexSpec {
		name: Some(name),
		x: number(columns.next(), line, "x")?,
		y: number(columns.next(), line, "y")?,
		size: number(columns.next(), line, "size")?,
		..VertexSpec::default()
	})
}

fn edge(columns: &[&str], count: usize, line: usize) -> Result<NetworkEdge> {
	let endpoint = |column: Option<&&str>, what: &str| -> Result<usize> {
		let index: usize = number(column.copied(), line, what)?
			.ok_or_else(|| GraphError::parse(FORMAT, line, format!("missing {what}")))?;
		if index == 0 || index > count {
			return Err(GraphError::parse(
				FORMAT,
				line,
				format!("{what} {index} is not one of the {count} vertices"),
			));
		}
		Ok(index - 1)
	};
	Ok(NetworkEdge {
		source: endpoint(columns.get(1), "source")?,
		target: endpoint(columns.get(2), "target")?,
		spec: EdgeSpec {
			weight: number(columns.get(3).copied(), line, "weight")?,
			..EdgeSpec::default()
		},
	})
}

pub(super) fn read(data: &str) -> Result<Network> {
	let mut network = Network::default();
	let mut section = Section::Other;

	for (index, raw) in data.lines().enumerate() {
		let line = index + 1;
		let text = raw.trim();
		if text.is_empty() {
			continue;
		}
		if text.starts_with('*') {
			let header = text.to_ascii_lowercase();
			section = if header.starts_with("*vertices") {
				Section::Vertices
			} else if header.starts_with("*edges") || header.starts_with("*arcs") {
				Section::Edges
			} else {
				Section::Other
			};
			continue;
		}
		match section {
			Section::Vertices => {
				// Drop the running index; vertices are numbered by position.
				let rest = text.split_once(char::is_whitespace).map_or("", |(_, rest)| rest);
				network.vertices.push(vertex(rest, line)?);
			}
			Section::Edges => {
				let columns: Vec<&str> = text.split_whitespace().collect();
				network.edges.push(edge(&columns, network.vertices.len(), line)?);
			}
			Section::Other => debug!("pajek line {line} outside any known section"),
		}
	}
	Ok(network)
}

pub(super) fn write(graph: &Graph) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "*Vertices {}", graph.count());
	for (index, vertex) in graph.vertices().enumerate() {
		let _ = writeln!(
			out,
			"{} {} {} {} {}",
			index + 1,
			quote(vertex.name()),
			vertex.x,
			vertex.y,
			vertex.size
		);
	}
	out.push('\n');
	out.push_str("*Edges\n");
	let mut written = 0;
	for edge in graph.edges() {
		if let (Some(source), Some(target)) =
			(graph.index_of(edge.source()), graph.index_of(edge.target()))
		{
			written += 1;
			let _ = writeln!(out, "{written} {} {} {}", source + 1, target + 1, edge.weight);
		}
	}
	out
}
