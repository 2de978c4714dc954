//! Force-settling directed graph engine with pluggable constraint layouts, and the
//! Leptos client-side app that draws it on a canvas.
//!
//! The engine ([`Graph`]) keeps vertices, edges and adjacency consistent and seeds new
//! vertices next to their parents. A [`Session`] drives the graph frame by frame through
//! a [`LayoutPipeline`]: physics first, then the constraint layouts.
//!
//! ```
//! use graph_stage::{Direction, Graph};
//!
//! let mut graph = Graph::default();
//! let root = graph.set_root("root").unwrap();
//! graph.connect(root, "a").unwrap().connect("a", "b").unwrap();
//! let a = graph.get("a").unwrap();
//! let b = graph.get("b").unwrap();
//! assert_eq!(graph.vertex(b).unwrap().level(), 2);
//! assert!(graph.connects(a, b, Direction::Forward));
//! assert_eq!(graph.successors(root, Some(1)).unwrap(), vec![a]);
//! ```

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Core
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod layouts;
pub mod session;

// UI
pub mod components;
mod pages;

pub use config::{ForceConfig, GraphConfig, LabelAlignment, LabelConfig, SatelliteConfig, ZoomConfig};
pub use error::{GraphError, Result};
pub use format::{Format, Network, NetworkEdge};
pub use graph::{
	BBox, Direction, Edge, EdgeId, EdgeSpec, Endpoint, EventHandler, EventKind, Filter, Graph, Item,
	ItemEvent, ItemKind, Link, Point, Satellite, Vertex, VertexId, VertexSpec,
};
pub use layouts::{
	ForceLayout, LabelLayout, Layout, LayoutPipeline, RadialLayout, SatelliteLayout, ViewTransform,
	ZoomLayout,
};
pub use session::{Lifecycle, Session};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Graph Stage" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
