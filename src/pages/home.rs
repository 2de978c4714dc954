use leptos::prelude::*;
use log::info;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
use crate::graph::{EventHandler, EventKind, Item};

/// Sample tree rooted at vertex 0; every seventh vertex carries a satellite.
fn generate_sample_data(n: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| GraphNode {
			id: i.to_string(),
			label: (i < 10).then(|| format!("Node {i}")),
			color: None,
			group: Some((i % 10) as u32),
			satellite: i > 0 && i % 7 == 0,
		})
		.collect();

	let links: Vec<GraphLink> = (1..n)
		.map(|i| {
			let source = (rand_simple(i) * (i as f64)) as usize;
			GraphLink {
				source: source.to_string(),
				target: i.to_string(),
			}
		})
		.collect();

	GraphData {
		nodes,
		links,
		root: Some("0".into()),
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || generate_sample_data(60));
	let on_event = EventHandler::new(|event| match (event.kind, event.item) {
		(EventKind::Freeze, _) => info!("layout settled"),
		(EventKind::Click, Some(Item::Vertex(vertex))) => info!("clicked {vertex}"),
		_ => {}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas data=graph_data fullscreen=true on_event=on_event />
				<div class="graph-overlay">
					<h1>"Graph Stage"</h1>
					<p class="subtitle">"Drag vertices to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_is_a_tree_under_the_root() {
		let data = generate_sample_data(30);
		let session = data.session(800.0, 600.0).unwrap();
		let graph = session.graph();
		assert_eq!(graph.count(), 30);
		assert_eq!(graph.edges().count(), 29);
		let root = graph.root().unwrap();
		assert_eq!(graph.successors(root, None).unwrap().len(), 29);
	}
}
