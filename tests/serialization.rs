use graph_stage::format::{self, Format};
use graph_stage::{EdgeSpec, Graph, GraphError, Session, VertexSpec};

fn sample() -> Graph {
	let mut graph = Graph::default();
	graph
		.add(VertexSpec::named("alpha").at(12.5, -3.0).with_size(4.0))
		.unwrap();
	graph
		.add(VertexSpec::named("beta \"b\"").at(100.0, 250.75))
		.unwrap();
	graph
		.add(VertexSpec::named("gamma").at(0.0, 0.0).with_size(9.0))
		.unwrap();
	graph.connect_with("alpha", "beta \"b\"", EdgeSpec::weighted(3.0)).unwrap();
	graph.connect("beta \"b\"", "gamma").unwrap();
	graph.connect("gamma", "alpha").unwrap();
	graph
}

fn edge_names(graph: &Graph) -> Vec<(String, String)> {
	let mut pairs: Vec<_> = graph
		.edges()
		.map(|edge| {
			let name = |id| graph.vertex(id).unwrap().name().to_owned();
			(name(edge.source()), name(edge.target()))
		})
		.collect();
	pairs.sort();
	pairs
}

#[test]
fn pajek_round_trip_keeps_names_geometry_and_edges() {
	let original = sample();
	let text = original.export(Format::Pajek).unwrap();

	let mut copy = Graph::default();
	copy.import(&text, Format::Pajek).unwrap();

	assert_eq!(copy.count(), original.count());
	for vertex in original.vertices() {
		let twin = copy.vertex(copy.get(vertex.name()).unwrap()).unwrap();
		assert_eq!(
			(twin.x, twin.y, twin.size),
			(vertex.x, vertex.y, vertex.size),
			"{}",
			vertex.name()
		);
	}
	assert_eq!(edge_names(&copy), edge_names(&original));
	let alpha = copy.get("alpha").unwrap();
	let beta = copy.get("beta \"b\"").unwrap();
	let edge = copy.get_edge(alpha, beta).unwrap();
	assert_eq!(copy.edge(edge).unwrap().weight, 3.0);
}

#[test]
fn pajek_layout_matches_the_exchange_format() {
	let text = sample().export(Format::Pajek).unwrap();
	let lines: Vec<_> = text.lines().collect();
	assert_eq!(lines[0], "*Vertices 3");
	assert!(lines[1].starts_with("1 \"alpha\" "));
	assert_eq!(lines[4], "");
	assert_eq!(lines[5], "*Edges");
	assert_eq!(lines[6], "1 1 2 3");
	assert_eq!(lines.len(), 9);
}

#[cfg(feature = "dot")]
#[test]
fn dot_round_trip_keeps_identity() {
	let original = sample();
	let text = original.export(Format::Dot).unwrap();
	let mut copy = Graph::default();
	copy.import(&text, Format::Dot).unwrap();

	let mut names: Vec<_> = copy.vertices().map(|vertex| vertex.name().to_owned()).collect();
	names.sort();
	assert_eq!(names, vec!["alpha", "beta \"b\"", "gamma"]);
	assert_eq!(edge_names(&copy), edge_names(&original));
}

#[test]
fn detached_reading_leaves_graphs_alone() {
	let network = format::read(Format::Pajek, "*Vertices 2\n1 \"a\"\n2 \"b\"\n*Edges\n1 2 1\n").unwrap();
	assert_eq!(network.vertices.len(), 2);
	assert_eq!(network.name(network.edges[0].source), Some("b"));
	assert_eq!(network.name(network.edges[0].target), Some("a"));
}

#[test]
fn unknown_tokens_and_bad_input_are_errors() {
	assert!(matches!("xml".parse::<Format>(), Err(GraphError::UnknownFormat(_))));
	let mut graph = sample();
	let error = graph.import("*Vertices 1\n1 \"a\" x\n", Format::Pajek).unwrap_err();
	assert!(matches!(error, GraphError::Parse { format: "pajek", line: 2, .. }));
	// A failed read leaves the graph untouched.
	assert_eq!(graph.count(), 3);
}

#[test]
fn session_import_stops_the_run() {
	let mut session = Session::default();
	session.graph_mut().connect("a", "b").unwrap();
	session.start();
	let text = session.export(Format::Pajek).unwrap();

	session.import(&text, Format::Pajek).unwrap();
	assert!(!session.running());
	assert_eq!(session.graph().count(), 2);
}

#[test]
fn a_failed_import_keeps_the_previous_graph() {
	let mut graph = Graph::default();
	graph.connect("keep", "me").unwrap();
	let keep = graph.get("keep").unwrap();

	let error = graph
		.import("*Vertices 2\n1 \"dup\"\n2 \"dup\"\n", Format::Pajek)
		.unwrap_err();

	assert!(matches!(error, GraphError::DuplicateName(name) if name == "dup"));
	assert_eq!(graph.count(), 2);
	assert_eq!(graph.get("keep"), Some(keep));
	assert!(graph.get("dup").is_none());
	assert_eq!(edge_names(&graph), vec![("keep".to_owned(), "me".to_owned())]);
}

fn multiline() -> Graph {
	let mut graph = Graph::default();
	graph
		.add(VertexSpec::named("two\nlines").at(1.0, 2.0).with_size(3.0))
		.unwrap();
	graph
		.add(VertexSpec::named("carriage\rreturn").at(4.0, 5.0))
		.unwrap();
	graph.connect("two\nlines", "carriage\rreturn").unwrap();
	graph
}

#[test]
fn pajek_names_with_line_breaks_survive_a_round_trip() {
	let original = multiline();
	let text = original.export(Format::Pajek).unwrap();
	assert!(text.contains("\"two\\nlines\""));
	assert_eq!(text.lines().count(), 6);

	let mut copy = Graph::default();
	copy.import(&text, Format::Pajek).unwrap();
	assert_eq!(copy.count(), 2);
	assert!(copy.get("carriage\rreturn").is_some());
	let twin = copy.vertex(copy.get("two\nlines").unwrap()).unwrap();
	assert_eq!((twin.x, twin.y, twin.size), (1.0, 2.0, 3.0));
	assert_eq!(edge_names(&copy), edge_names(&original));
}

#[cfg(feature = "dot")]
#[test]
fn dot_names_with_line_breaks_survive_a_round_trip() {
	let mut original = Graph::default();
	original.connect("two\nlines", "plain").unwrap();
	let text = original.export(Format::Dot).unwrap();

	let mut copy = Graph::default();
	copy.import(&text, Format::Dot).unwrap();
	assert!(copy.get("two\nlines").is_some());
	assert_eq!(edge_names(&copy), edge_names(&original));
}
