//! GraphViz DOT: vertices map to nodes, edges to `->` statements, names to labels.
//!
//! Writing goes through `petgraph`'s DOT renderer, so the format is only available
//! with the `dot` cargo feature.

#[cfg(not(feature = "dot"))]
use crate::error::GraphError;
use crate::error::Result;
use crate::graph::Graph;

use super::Network;

#[cfg(not(feature = "dot"))]
fn unavailable() -> GraphError {
	GraphError::MissingCollaborator {
		dependency: "DOT support",
		hint: "rebuild with the `dot` cargo feature enabled",
	}
}

#[cfg(not(feature = "dot"))]
pub(super) fn read(_data: &str) -> Result<Network> {
	Err(unavailable())
}

#[cfg(not(feature = "dot"))]
pub(super) fn write(_graph: &Graph) -> Result<String> {
	Err(unavailable())
}

#[cfg(feature = "dot")]
pub(super) use self::enabled::{read, write};

#[cfg(feature = "dot")]
mod enabled {
	use std::collections::HashMap;

	use petgraph::dot::{Config, Dot};
	use petgraph::graph::DiGraph;

	use super::{Graph, Network, Result};
	use crate::error::GraphError;
	use crate::format::NetworkEdge;
	use crate::graph::{EdgeSpec, VertexSpec};

	const FORMAT: &str = "dot";

	pub(in crate::format) fn write(graph: &Graph) -> Result<String> {
		let mut dot: DiGraph<&str, &str> = DiGraph::new();
		let nodes: HashMap<_, _> = graph
			.vertices()
			.map(|vertex| (vertex.id(), dot.add_node(vertex.name())))
			.collect();
		for edge in graph.edges() {
			if let (Some(&source), Some(&target)) = (nodes.get(&edge.source()), nodes.get(&edge.target())) {
				dot.add_edge(source, target, "");
			}
		}
		Ok(format!("{}", Dot::with_config(&dot, &[Config::EdgeNoLabel])))
	}

	#[derive(Clone, Debug, PartialEq)]
	enum Token {
		Id(String),
		Arrow,
		Punct(char),
	}

	fn tokenize(data: &str) -> Result<Vec<(usize, Token)>> {
		let mut tokens = Vec::new();
		let mut line = 1;
		let mut chars = data.chars().peekable();
		while let Some(c) = chars.next() {
			match c {
				'\n' => line += 1,
				c if c.is_whitespace() => {}
				'/' if chars.peek() == Some(&'/') => {
					for c in chars.by_ref() {
						if c == '\n' {
							line += 1;
							break;
						}
					}
				}
				'#' => {
					for c in chars.by_ref() {
						if c == '\n' {
							line += 1;
							break;
						}
					}
				}
				'/' if chars.peek() == Some(&'*') => {
					chars.next();
					let mut previous = '\0';
					for c in chars.by_ref() {
						if c == '\n' {
							line += 1;
						}
						if previous == '*' && c == '/' {
							break;
						}
						previous = c;
					}
				}
				'-' if chars.peek() == Some(&'>') => {
					chars.next();
					tokens.push((line, Token::Arrow));
				}
				'-' if chars.peek() == Some(&'-') => {
					return Err(GraphError::parse(FORMAT, line, "undirected edges are not supported"));
				}
				'"' => {
					let start = line;
					let mut id = String::new();
					let mut closed = false;
					while let Some(c) = chars.next() {
						match c {
							'\\' => match chars.next() {
								Some('"') => id.push('"'),
								Some('\\') => id.push('\\'),
								// petgraph writes line breaks as `\l`.
								Some('l' | 'n') => id.push('\n'),
								Some(other) => {
									id.push('\\');
									id.push(other);
								}
								None => {}
							},
							'"' => {
								closed = true;
								break;
							}
							'\n' => {
								line += 1;
								id.push('\n');
							}
							c => id.push(c),
						}
					}
					if !closed {
						return Err(GraphError::parse(FORMAT, start, "unterminated string"));
					}
					tokens.push((start, Token::Id(id)));
				}
				c if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' => {
					let mut id = String::from(c);
					while let Some(&next) = chars.peek() {
						if next.is_alphanumeric() || next == '_' || next == '.' {
							id.push(next);
							chars.next();
						} else {
							break;
						}
					}
					tokens.push((line, Token::Id(id)));
				}
				c => tokens.push((line, Token::Punct(c))),
			}
		}
		Ok(tokens)
	}

	/// Nodes in order of first appearance, each remembering its label when it has one.
	#[derive(Default)]
	struct Nodes {
		order: Vec<String>,
		labels: HashMap<String, String>,
		index: HashMap<String, usize>,
	}

	impl Nodes {
		fn touch(&mut self, id: &str) -> usize {
			if let Some(&index) = self.index.get(id) {
				return index;
			}
			self.order.push(id.to_owned());
			self.index.insert(id.to_owned(), self.order.len() - 1);
			self.order.len() - 1
		}
	}

	struct Parser {
		tokens: Vec<(usize, Token)>,
		position: usize,
	}

	impl Parser {
		fn peek(&self) -> Option<&Token> {
			self.tokens.get(self.position).map(|(_, token)| token)
		}

		fn line(&self) -> usize {
			self.tokens
				.get(self.position)
				.or_else(|| self.tokens.last())
				.map_or(1, |(line, _)| *line)
		}

		fn bump(&mut self) -> Option<Token> {
			let token = self.tokens.get(self.position).map(|(_, token)| token.clone());
			self.position += 1;
			token
		}

		fn expect(&mut self, expected: char) -> Result<()> {
			let line = self.line();
			match self.bump() {
				Some(Token::Punct(c)) if c == expected => Ok(()),
				other => Err(GraphError::parse(
					FORMAT,
					line,
					format!("expected '{expected}', found {other:?}"),
				)),
			}
		}

		fn id(&mut self) -> Result<String> {
			let line = self.line();
			match self.bump() {
				Some(Token::Id(id)) => Ok(id),
				other => Err(GraphError::parse(FORMAT, line, format!("expected an identifier, found {other:?}"))),
			}
		}

		/// `[ key = value, ... ]`, possibly repeated.
		fn attributes(&mut self) -> Result<Vec<(String, String)>> {
			let mut attributes = Vec::new();
			while self.peek() == Some(&Token::Punct('[')) {
				self.bump();
				loop {
					match self.peek() {
						Some(Token::Punct(']')) => {
							self.bump();
							break;
						}
						Some(Token::Punct(',' | ';')) => {
							self.bump();
						}
						_ => {
							let key = self.id()?;
							self.expect('=')?;
							let value = self.id()?;
							attributes.push((key, value));
						}
					}
				}
			}
			Ok(attributes)
		}

		fn graph(&mut self) -> Result<(Nodes, Vec<(usize, usize)>)> {
			let line = self.line();
			let mut keyword = self.id()?;
			if keyword.eq_ignore_ascii_case("strict") {
				keyword = self.id()?;
			}
			if !keyword.eq_ignore_ascii_case("digraph") {
				return Err(GraphError::parse(FORMAT, line, format!("expected digraph, found {keyword:?}")));
			}
			if matches!(self.peek(), Some(Token::Id(_))) {
				self.bump();
			}
			self.expect('{')?;

			let mut nodes = Nodes::default();
			let mut edges = Vec::new();
			loop {
				match self.peek() {
					Some(Token::Punct('}')) => {
						self.bump();
						break;
					}
					Some(Token::Punct(';')) => {
						self.bump();
					}
					None => return Err(GraphError::parse(FORMAT, self.line(), "missing '}'")),
					_ => self.statement(&mut nodes, &mut edges)?,
				}
			}
			Ok((nodes, edges))
		}

		fn statement(&mut self, nodes: &mut Nodes, edges: &mut Vec<(usize, usize)>) -> Result<()> {
			let first = self.id()?;
			let lowered = first.to_ascii_lowercase();
			if matches!(lowered.as_str(), "graph" | "node" | "edge") {
				self.attributes()?;
				return Ok(());
			}
			if self.peek() == Some(&Token::Punct('=')) {
				self.bump();
				self.id()?;
				return Ok(());
			}

			let mut chain = vec![nodes.touch(&first)];
			while self.peek() == Some(&Token::Arrow) {
				self.bump();
				let id = self.id()?;
				chain.push(nodes.touch(&id));
			}
			let attributes = self.attributes()?;
			if chain.len() == 1 {
				if let Some((_, label)) = attributes.into_iter().find(|(key, _)| key == "label") {
					nodes.labels.insert(first, label);
				}
			} else {
				edges.extend(chain.windows(2).map(|pair| (pair[0], pair[1])));
			}
			Ok(())
		}
	}

	pub(in crate::format) fn read(data: &str) -> Result<Network> {
		let mut parser = Parser {
			tokens: tokenize(data)?,
			position: 0,
		};
		let (nodes, edges) = parser.graph()?;
		let vertices = nodes
			.order
			.iter()
			.map(|id| VertexSpec::named(nodes.labels.get(id).unwrap_or(id).clone()))
			.collect();
		let edges = edges
			.into_iter()
			.map(|(source, target)| NetworkEdge {
				source,
				target,
				spec: EdgeSpec::default(),
			})
			.collect();
		Ok(Network { vertices, edges })
	}
}

#[cfg(all(test, feature = "dot"))]
mod tests {
	use super::*;

	#[test]
	fn written_dot_reads_back() {
		let mut graph = Graph::default();
		graph.connect("a", "b c").unwrap().connect("b c", "a").unwrap();
		let text = write(&graph).unwrap();
		assert!(text.starts_with("digraph {"));
		assert!(text.contains("label = \"b c\""));

		let network = read(&text).unwrap();
		assert_eq!(network.name(0), Some("a"));
		assert_eq!(network.name(1), Some("b c"));
		let pairs: Vec<_> = network.edges.iter().map(|edge| (edge.source, edge.target)).collect();
		assert_eq!(pairs, vec![(0, 1), (1, 0)]);
	}

	#[test]
	fn reads_hand_written_dot() {
		let network = read(
			"strict digraph deps {\n  // services\n  rankdir = LR;\n  node [shape=box];\n  api -> db -> cache;\n  \"web app\" -> api [color=red]\n}\n",
		)
		.unwrap();
		let names: Vec<_> = (0..4).filter_map(|index| network.name(index)).collect();
		assert_eq!(names, vec!["api", "db", "cache", "web app"]);
		assert_eq!(network.edges.len(), 3);
	}

	#[test]
	fn refuses_undirected_graphs() {
		assert!(read("graph { a -- b }").is_err());
		assert!(read("digraph { a -> }").is_err());
	}
}

#[cfg(all(test, not(feature = "dot")))]
mod tests {
	use super::*;

	#[test]
	fn reports_the_missing_feature() {
		let error = read("digraph {}").unwrap_err();
		assert!(error.to_string().contains("`dot` cargo feature"));
	}
}
