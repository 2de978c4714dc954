use graph_stage::{Direction, EdgeSpec, Filter, Graph, GraphError, Item, Link, VertexId, VertexSpec};

fn assert_symmetric(graph: &Graph) {
	for edge in graph.edges() {
		let source = graph.vertex(edge.source()).unwrap();
		let target = graph.vertex(edge.target()).unwrap();
		assert!(source.successors().contains(&edge.target()));
		assert!(target.predecessors().contains(&edge.source()));
	}
	for vertex in graph.vertices() {
		for &successor in vertex.successors() {
			assert!(graph.get_edge(vertex.id(), successor).is_some());
		}
		for &predecessor in vertex.predecessors() {
			assert!(graph.get_edge(predecessor, vertex.id()).is_some());
		}
	}
}

fn chain() -> (Graph, [VertexId; 4]) {
	let mut graph = Graph::default();
	let root = graph.set_root("root").unwrap();
	graph
		.connect(root, "A")
		.unwrap()
		.connect("A", "B")
		.unwrap()
		.connect("B", "C")
		.unwrap();
	let [a, b, c] = ["A", "B", "C"].map(|name| graph.get(name).unwrap());
	(graph, [root, a, b, c])
}

#[test]
fn adjacency_stays_symmetric_through_mutations() {
	let mut graph = Graph::default();
	for (source, target) in [("a", "b"), ("b", "c"), ("c", "a"), ("a", "d"), ("d", "d")] {
		graph.connect(source, target).unwrap();
	}
	assert_symmetric(&graph);

	let a = graph.get("a").unwrap();
	let b = graph.get("b").unwrap();
	let d = graph.get("d").unwrap();
	graph.disconnect(a, [b, d]);
	assert_symmetric(&graph);
	graph.remove(graph.get("c").unwrap());
	assert_symmetric(&graph);
	assert_eq!(graph.edges().count(), 1);
}

#[test]
fn connect_is_idempotent() {
	let mut graph = Graph::default();
	graph.connect("a", "b").unwrap();
	let a = graph.get("a").unwrap();
	graph.connect("a", "b").unwrap();
	assert_eq!(graph.edges().count(), 1);
	assert_eq!(graph.vertex(a).unwrap().successors().len(), 1);
}

#[test]
fn levels_follow_the_shallowest_predecessor() {
	let (graph, [root, a, b, c]) = chain();
	assert_eq!(graph.vertex(root).unwrap().level(), 0);
	assert_eq!(graph.vertex(a).unwrap().level(), 1);
	assert_eq!(graph.vertex(b).unwrap().level(), 2);
	assert_eq!(graph.vertex(c).unwrap().level(), 3);
}

#[test]
fn removal_cascades_to_every_incident_edge() {
	let mut graph = Graph::default();
	graph
		.connect("hub", "x")
		.unwrap()
		.connect("y", "hub")
		.unwrap()
		.connect("hub", "hub")
		.unwrap()
		.connect("x", "y")
		.unwrap();
	let hub = graph.get("hub").unwrap();
	let before = graph.edges().count();

	graph.remove(hub);

	assert_eq!(graph.edges().count(), before - 3);
	assert!(!graph.contains(hub));
	for vertex in graph.vertices() {
		assert!(!vertex.successors().contains(&hub));
		assert!(!vertex.predecessors().contains(&hub));
	}
	// Removing it again is a no-op.
	graph.remove(hub);
	assert_eq!(graph.count(), 2);
}

#[test]
fn self_edges_are_their_own_neighbors() {
	let mut graph = Graph::default();
	graph.connect("v", "v").unwrap();
	let v = graph.get("v").unwrap();
	let vertex = graph.vertex(v).unwrap();
	assert_eq!(vertex.successors(), &[v]);
	assert_eq!(vertex.predecessors(), &[v]);
	assert!(graph.connects(v, v, Direction::Forward));
	assert!(graph.connects(v, v, Direction::Both));
}

#[test]
fn traversal_depth_limits_along_a_chain() {
	let (graph, [root, a, b, c]) = chain();
	assert_eq!(graph.successors(root, Some(1)).unwrap(), vec![a]);
	assert_eq!(graph.successors(root, Some(2)).unwrap(), vec![a, b]);
	assert_eq!(graph.successors(root, Some(3)).unwrap(), vec![a, b, c]);
	assert_eq!(graph.successors(root, None).unwrap(), vec![a, b, c]);
	assert_eq!(graph.predecessors(c, None).unwrap(), vec![b, a, root]);
}

#[test]
fn traversal_terminates_on_cycles() {
	let mut graph = Graph::default();
	graph
		.connect("a", "b")
		.unwrap()
		.connect("b", "c")
		.unwrap()
		.connect("c", "a")
		.unwrap();
	let a = graph.get("a").unwrap();
	let reached = graph.successors(a, None).unwrap();
	assert_eq!(reached.len(), 3);
}

#[test]
fn traversal_rejects_stale_handles() {
	let (mut graph, [_, a, ..]) = chain();
	graph.remove(a);
	assert!(matches!(graph.successors(a, None), Err(GraphError::UnknownVertex(id)) if id == a));
}

#[test]
fn connects_respects_direction() {
	let mut graph = Graph::default();
	graph.connect("A", "B").unwrap();
	let a = graph.get("A").unwrap();
	let b = graph.get("B").unwrap();
	assert!(graph.connects(a, b, Direction::Forward));
	assert!(!graph.connects(b, a, Direction::Forward));
	assert!(graph.connects(a, b, Direction::Any));
	assert!(!graph.connects(a, b, Direction::Both));

	graph.connect("B", "A").unwrap();
	assert!(graph.connects(a, b, Direction::Both));
}

#[test]
fn reduce_drops_weakly_connected_vertices_but_keeps_the_root() {
	let mut graph = Graph::default();
	let root = graph.set_root("root").unwrap();
	graph.add(VertexSpec::named("loner")).unwrap();
	graph
		.connect("a", "b")
		.unwrap()
		.connect("a", "c")
		.unwrap();

	graph.reduce(0);
	assert!(graph.get("loner").is_none());
	assert!(graph.contains(root));
	assert_eq!(graph.count(), 4);

	graph.reduce(1);
	assert!(graph.get("b").is_none());
	assert!(graph.get("c").is_none());
	// "a" lost its edges as its leaves went; it survives this pass.
	assert!(graph.get("a").is_some());
}

#[test]
fn a_new_root_replaces_the_old_one() {
	let mut graph = Graph::default();
	let first = graph.set_root("first").unwrap();
	let vertex = graph.vertex_mut(first).unwrap();
	vertex.x = 10.0;
	vertex.y = 10.0;
	let second = graph.set_root("second").unwrap();

	let first = graph.vertex(first).unwrap();
	assert!(!first.is_root() && !first.fixed);
	let second = graph.vertex(second).unwrap();
	assert!(second.is_root() && second.fixed);
	assert_eq!((second.x, second.y), (400.0, 300.0));
	assert_eq!(graph.filter(&Filter::vertices().root()).len(), 1);
}

#[test]
fn filter_matches_every_set_field() {
	let mut graph = Graph::default();
	graph
		.add(VertexSpec::named("red").with_attribute("color", "red"))
		.unwrap();
	graph
		.add(VertexSpec::named("blue").with_attribute("color", "blue"))
		.unwrap();
	graph
		.connect_with("red", "blue", EdgeSpec::weighted(2.0))
		.unwrap();
	let red = graph.get("red").unwrap();

	let reds = graph.filter(&Filter::vertices().attribute("color", "red"));
	assert_eq!(reds, vec![Item::Vertex(red)]);
	// A falsy attribute value is a wildcard.
	assert_eq!(graph.filter(&Filter::vertices().attribute("color", "")).len(), 2);
	assert_eq!(graph.filter(&Filter::edges().source(red)).len(), 1);
	assert!(graph.filter(&Filter::edges().level(1)).is_empty());
}

#[test]
fn bulk_replace_keeps_adjacency_consistent() {
	let mut graph = Graph::default();
	graph.connect("old", "older").unwrap();
	graph
		.set_vertices(["a", "b", "c"].map(VertexSpec::from))
		.unwrap()
		.set_edges([Link::new("a", "b"), Link::new("b", "c"), Link::new("c", "new")])
		.unwrap();

	assert_eq!(graph.count(), 4);
	assert!(graph.get("old").is_none());
	assert_symmetric(&graph);

	graph.set_edges([Link::new("c", "a")]).unwrap();
	assert_eq!(graph.edges().count(), 1);
	assert_symmetric(&graph);
	let b = graph.get("b").unwrap();
	assert_eq!(graph.vertex(b).unwrap().degree(), 0);
}

#[test]
fn duplicate_names_are_refused() {
	let mut graph = Graph::default();
	graph.add(VertexSpec::named("a")).unwrap();
	assert!(matches!(
		graph.add(VertexSpec::named("a")),
		Err(GraphError::DuplicateName(name)) if name == "a"
	));
}
