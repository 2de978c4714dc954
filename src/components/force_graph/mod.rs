//! Canvas rendering of a graph session: picking, dragging, panning and zooming.

mod component;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::{GraphData, GraphLink, GraphNode, canvas_layouts};
