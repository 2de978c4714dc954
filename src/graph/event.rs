use std::fmt;
use std::sync::Arc;

use super::{EdgeId, VertexId};

/// A vertex or an edge of a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Item {
	/// A vertex.
	Vertex(VertexId),
	/// An edge.
	Edge(EdgeId),
}

/// Which collection an [`Item`] or a [`Filter`](super::Filter) addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
	/// Vertices.
	Vertex,
	/// Edges.
	Edge,
}

impl ItemKind {
	/// Lowercase name of the kind.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vertex => "vertex",
			Self::Edge => "edge",
		}
	}
}

impl Item {
	/// Whether this is a vertex or an edge.
	pub fn kind(self) -> ItemKind {
		match self {
			Self::Vertex(_) => ItemKind::Vertex,
			Self::Edge(_) => ItemKind::Edge,
		}
	}
}

/// What happened to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// The pointer entered the item.
	MouseOver,
	/// The pointer left the item.
	MouseOut,
	/// A button went down on the item.
	MouseDown,
	/// The button was released over the item.
	MouseUp,
	/// Press and release without moving in between.
	Click,
	/// Two clicks in quick succession.
	DoubleClick,
	/// The run settled; sent to the graph's default handler without an item.
	Freeze,
}

/// One notification delivered to an [`EventHandler`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemEvent {
	/// What happened.
	pub kind: EventKind,
	/// `None` for graph-wide events such as `Freeze`.
	pub item: Option<Item>,
}

/// Callback receiving pointer and settling events.
///
/// Vertices and edges keep a clone of the handler that was the graph's default
/// when they were created.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&ItemEvent) + Send + Sync>);

impl EventHandler {
	/// Wraps a callback.
	pub fn new(handler: impl Fn(&ItemEvent) + Send + Sync + 'static) -> Self {
		Self(Arc::new(handler))
	}

	/// Delivers one event.
	pub fn call(&self, event: &ItemEvent) {
		(self.0)(event)
	}
}

impl fmt::Debug for EventHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("EventHandler")
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	fn shareable<T: Send + Sync + 'static>(_: &T) {}

	#[test]
	fn handlers_are_shareable_across_threads() {
		let clicks = Arc::new(AtomicUsize::new(0));
		let counter = clicks.clone();
		let handler = EventHandler::new(move |event| {
			if event.kind == EventKind::Click {
				counter.fetch_add(1, Ordering::Relaxed);
			}
		});
		shareable(&handler);

		let copy = handler.clone();
		let event = ItemEvent {
			kind: EventKind::Click,
			item: None,
		};
		std::thread::spawn(move || copy.call(&event)).join().unwrap();
		handler.call(&event);
		assert_eq!(clicks.load(Ordering::Relaxed), 2);
	}
}
