//! Error type shared by the graph engine, the layouts and the interchange formats.

use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

/// Everything the engine refuses to do.
///
/// No-op requests (reconnecting an existing pair, disconnecting a missing edge,
/// removing an absent vertex) are not errors and never produce one.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The handle is stale or belongs to another graph.
	#[error("vertex {0} is not part of this graph")]
	UnknownVertex(VertexId),

	/// The handle is stale or belongs to another graph.
	#[error("edge {0} is not part of this graph")]
	UnknownEdge(EdgeId),

	/// Vertex names are unique within a graph.
	#[error("a vertex named {0:?} already exists")]
	DuplicateName(String),

	/// An interchange format token nobody reads or writes.
	#[error("unknown format {0:?} (expected \"pajek\" or \"dot\")")]
	UnknownFormat(String),

	/// A capability compiled out of this build.
	#[error("{dependency} is not available: {hint}")]
	MissingCollaborator {
		/// What is missing.
		dependency: &'static str,
		/// How to get it back.
		hint: &'static str,
	},

	/// Malformed interchange text.
	#[error("{format} line {line}: {message}")]
	Parse {
		/// Which reader failed.
		format: &'static str,
		/// 1-based line of the offending input.
		line: usize,
		/// What was wrong.
		message: String,
	},

	/// A configuration document that does not deserialize.
	#[error("invalid configuration: {0}")]
	Config(#[from] serde_json::Error),
}

impl GraphError {
	pub(crate) fn parse(format: &'static str, line: usize, message: impl Into<String>) -> Self {
		Self::Parse {
			format,
			line,
			message: message.into(),
		}
	}
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;
