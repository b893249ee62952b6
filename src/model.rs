//! Graph input types and the pure filtering logic behind the map and
//! detail-diagram renderers.

use serde::Deserialize;

/// A graph entity carrying an identifier and a country name. Ids are not
/// required to be unique; several nodes may share one country.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: String,
	pub country: String,
}

/// A directed reference between two node ids. Endpoints referencing no node
/// are skipped at the point of use.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	pub source: String,
	pub target: String,
}

/// The exact shape of the pasted JSON document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Graph {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

/// A geocoded coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLng {
	pub lat: f64,
	pub lon: f64,
}

/// Static country fill colors for the detail diagram and its legend.
pub const COUNTRY_COLORS: &[(&str, &str)] = &[("Germany", "#ff0000"), ("France", "#0000ff")];

/// Fill color for countries absent from [`COUNTRY_COLORS`].
pub const DEFAULT_COLOR: &str = "#00ff00";

pub fn color_for_country(country: &str) -> &'static str {
	COUNTRY_COLORS
		.iter()
		.find(|(name, _)| *name == country)
		.map(|(_, color)| *color)
		.unwrap_or(DEFAULT_COLOR)
}

pub fn find_node<'a>(graph: &'a Graph, id: &str) -> Option<&'a Node> {
	graph.nodes.iter().find(|node| node.id == id)
}

/// Every distinct country a render has to geocode, in first-seen order:
/// node countries first, then the endpoint countries of well-formed edges.
/// Dangling edges contribute nothing.
pub fn lookup_countries(graph: &Graph) -> Vec<String> {
	let mut countries: Vec<String> = Vec::new();
	let mut push = |country: &str| {
		if !countries.iter().any(|c| c == country) {
			countries.push(country.to_string());
		}
	};
	for node in &graph.nodes {
		push(&node.country);
	}
	for (source, target) in resolved_edges(graph) {
		push(&source.country);
		push(&target.country);
	}
	countries
}

/// Edges whose both endpoint ids match a node, resolved to the nodes.
pub fn resolved_edges<'a>(graph: &'a Graph) -> Vec<(&'a Node, &'a Node)> {
	graph
		.edges
		.iter()
		.filter_map(|edge| {
			let source = find_node(graph, &edge.source)?;
			let target = find_node(graph, &edge.target)?;
			Some((source, target))
		})
		.collect()
}

/// Ids of every node located in `country`, in node order. These are the
/// entries a pin's context menu lists.
pub fn ids_in_country(graph: &Graph, country: &str) -> Vec<String> {
	graph
		.nodes
		.iter()
		.filter(|node| node.country == country)
		.map(|node| node.id.clone())
		.collect()
}

/// The detail-view subgraph: every node that appears as an endpoint of at
/// least one edge anywhere in the graph, plus the edges whose both endpoints
/// lie in that set. Deliberately the whole graph's connectivity, not the
/// selected node's direct neighbors.
pub fn detail_subgraph(graph: &Graph) -> (Vec<Node>, Vec<Edge>) {
	let nodes: Vec<Node> = graph
		.nodes
		.iter()
		.filter(|node| {
			graph
				.edges
				.iter()
				.any(|edge| edge.source == node.id || edge.target == node.id)
		})
		.cloned()
		.collect();

	let edges: Vec<Edge> = graph
		.edges
		.iter()
		.filter(|edge| {
			nodes.iter().any(|n| n.id == edge.source) && nodes.iter().any(|n| n.id == edge.target)
		})
		.cloned()
		.collect();

	(nodes, edges)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, country: &str) -> Node {
		Node {
			id: id.into(),
			country: country.into(),
		}
	}

	fn edge(source: &str, target: &str) -> Edge {
		Edge {
			source: source.into(),
			target: target.into(),
		}
	}

	fn sample() -> Graph {
		Graph {
			nodes: vec![
				node("a", "Germany"),
				node("b", "France"),
				node("c", "Germany"),
				node("d", "Japan"),
			],
			edges: vec![edge("a", "b"), edge("b", "c"), edge("a", "ghost")],
		}
	}

	#[test]
	fn parses_the_documented_input_shape() {
		let graph: Graph = serde_json::from_str(
			r#"{"nodes":[{"id":"a","country":"Germany"}],"edges":[{"source":"a","target":"a"}]}"#,
		)
		.unwrap();
		assert_eq!(graph.nodes, vec![node("a", "Germany")]);
		assert_eq!(graph.edges, vec![edge("a", "a")]);
	}

	#[test]
	fn missing_sections_default_to_empty() {
		let graph: Graph = serde_json::from_str("{}").unwrap();
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn lookup_countries_dedups_and_skips_dangling_edges() {
		let countries = lookup_countries(&sample());
		// Two Germany nodes collapse to one entry; the edge to "ghost"
		// contributes nothing; edge endpoints are already covered by nodes.
		assert_eq!(countries, vec!["Germany", "France", "Japan"]);
	}

	#[test]
	fn lookup_count_stays_within_node_and_edge_bound() {
		let graph = sample();
		let bound = graph.nodes.len() + 2 * graph.edges.len();
		assert!(lookup_countries(&graph).len() <= bound);
	}

	#[test]
	fn resolved_edges_drop_dangling_references() {
		let graph = sample();
		let edges = resolved_edges(&graph);
		assert_eq!(edges.len(), 2);
		assert_eq!(edges[0].0.id, "a");
		assert_eq!(edges[0].1.id, "b");
		assert_eq!(edges[1].0.id, "b");
		assert_eq!(edges[1].1.id, "c");
	}

	#[test]
	fn ids_in_country_collects_co_located_nodes() {
		let graph = sample();
		assert_eq!(ids_in_country(&graph, "Germany"), vec!["a", "c"]);
		assert_eq!(ids_in_country(&graph, "France"), vec!["b"]);
		assert!(ids_in_country(&graph, "Atlantis").is_empty());
	}

	#[test]
	fn detail_subgraph_uses_whole_graph_connectivity() {
		let graph = sample();
		let (nodes, edges) = detail_subgraph(&graph);
		// "d" touches no edge and is excluded; "c" is included even though it
		// is not adjacent to "a", because the filter spans the full edge set.
		let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b", "c"]);
		// The dangling a->ghost edge is excluded.
		assert_eq!(edges, vec![edge("a", "b"), edge("b", "c")]);
	}

	#[test]
	fn detail_subgraph_of_isolated_nodes_is_empty() {
		let graph = Graph {
			nodes: vec![node("a", "Germany")],
			edges: vec![],
		};
		let (nodes, edges) = detail_subgraph(&graph);
		assert!(nodes.is_empty());
		assert!(edges.is_empty());
	}

	#[test]
	fn country_colors_fall_back_to_default() {
		assert_eq!(color_for_country("Germany"), "#ff0000");
		assert_eq!(color_for_country("France"), "#0000ff");
		assert_eq!(color_for_country("Japan"), DEFAULT_COLOR);
	}
}
