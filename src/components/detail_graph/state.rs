//! Detail-diagram state: a force simulation rebuilt from scratch for every
//! detail-view invocation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::model::{self, Edge, Node};

/// Nodes are seeded at random positions inside this square, as the original
/// diagram laid them out.
pub const LAYOUT_EXTENT: f64 = 500.0;

/// Node ellipses are a fixed 30x30.
pub const NODE_RADIUS: f64 = 15.0;

const FIT_PADDING: f64 = 60.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub color: String,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

pub struct DiagramState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub running: bool,
	seed: u64,
	node_count: usize,
	edge_count: usize,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

// Cheap LCG; seed positions only need to look scattered.
fn layout_rand(seed: u64) -> f64 {
	let x = seed
		.wrapping_mul(6364136223846793005)
		.wrapping_add(1442695040888963407);
	(x >> 33) as f64 / (1u64 << 31) as f64
}

impl DiagramState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: simulation(),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			width,
			height,
			running: false,
			seed: 0,
			node_count: 0,
			edge_count: 0,
		}
	}

	/// Throw away the previous diagram and build one for the given subgraph.
	/// Each node gets a random seed position in the layout square and a fill
	/// color keyed by its country; `selected_id` is highlighted. Edges with
	/// an endpoint missing from `nodes` are skipped.
	pub fn rebuild(&mut self, nodes: &[Node], edges: &[Edge], selected_id: &str) {
		self.seed = self.seed.wrapping_add(1);
		let mut graph = simulation();
		let mut id_to_idx: HashMap<&str, DefaultNodeIdx> = HashMap::new();
		self.edge_count = 0;

		for (i, node) in nodes.iter().enumerate() {
			let x = layout_rand(self.seed.wrapping_mul(2687).wrapping_add(2 * i as u64));
			let y = layout_rand(self.seed.wrapping_mul(2687).wrapping_add(2 * i as u64 + 1));
			let idx = graph.add_node(NodeData {
				x: (x * LAYOUT_EXTENT) as f32,
				y: (y * LAYOUT_EXTENT) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					color: model::color_for_country(&node.country).to_string(),
					selected: node.id == selected_id,
				},
			});
			// Duplicate ids: the last occurrence wins, as in the map popup.
			id_to_idx.insert(&node.id, idx);
		}

		for edge in edges {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				self.edge_count += 1;
			}
		}

		self.graph = graph;
		self.node_count = nodes.len();
		self.running = true;
		self.fit_view();
	}

	pub fn node_count(&self) -> usize {
		self.node_count
	}

	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	/// Center the seeded layout in the canvas at a zoom where it all fits.
	pub fn fit_view(&mut self) {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		let mut any = false;
		self.graph.visit_nodes(|node| {
			any = true;
			min_x = min_x.min(node.x() as f64);
			max_x = max_x.max(node.x() as f64);
			min_y = min_y.min(node.y() as f64);
			max_y = max_y.max(node.y() as f64);
		});
		if !any {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}

		let span_x = (max_x - min_x).max(2.0 * NODE_RADIUS);
		let span_y = (max_y - min_y).max(2.0 * NODE_RADIUS);
		let k = ((self.width - FIT_PADDING) / span_x)
			.min((self.height - FIT_PADDING) / span_y)
			.clamp(0.1, 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * (min_x + max_x) / 2.0,
			y: self.height / 2.0 - k * (min_y + max_y) / 2.0,
			k,
		};
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	/// Vary the layout scatter between sessions.
	pub fn reseed(&mut self, seed: u64) {
		self.seed = seed;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// The single live diagram state, shared by the canvas component and the
/// detail-view builder. Created once per page by the application context.
#[derive(Clone)]
pub struct DiagramHandle(Rc<RefCell<DiagramState>>);

impl DiagramHandle {
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(DiagramState::new(800.0, 600.0))))
	}

	pub fn with<R>(&self, f: impl FnOnce(&mut DiagramState) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}
}

impl Default for DiagramHandle {
	fn default() -> Self {
		Self::new()
	}
}
