//! Application context: the one live map, diagram and geocoder per page,
//! plus the shared UI signals. Components reach all of it through Leptos
//! context instead of ambient globals.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::components::detail_graph::DiagramHandle;
use crate::components::tile_map::{LatLngBounds, MapHandle};
use crate::geocode::GeocodeClient;
use crate::model::{self, Graph, LatLng};

/// Which fullscreen panel is showing. The page starts on the map and flips
/// to the diagram only on a successful detail-view build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivePanel {
	Map,
	Diagram,
}

/// The one open context menu, if any. Opening a menu replaces this slot, so
/// stale overlays can never pile up.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenuState {
	pub x: f64,
	pub y: f64,
	pub node_ids: Vec<String>,
}

#[derive(Clone)]
pub struct AppContext {
	pub map: MapHandle,
	pub diagram: DiagramHandle,
	pub geocoder: Rc<GeocodeClient>,
	pub graph: RwSignal<Graph>,
	pub panel: RwSignal<ActivePanel>,
	pub menu: RwSignal<Option<ContextMenuState>>,
	render_epoch: Rc<Cell<u64>>,
}

impl AppContext {
	pub fn new() -> Self {
		Self {
			map: MapHandle::new(),
			diagram: DiagramHandle::new(),
			geocoder: Rc::new(GeocodeClient::new()),
			graph: RwSignal::new(Graph::default()),
			panel: RwSignal::new(ActivePanel::Map),
			menu: RwSignal::new(None),
			render_epoch: Rc::new(Cell::new(0)),
		}
	}

	/// Parse a pasted JSON document and render it, or alert without touching
	/// the current map.
	pub fn submit_json(&self, text: &str) {
		match serde_json::from_str::<Graph>(text) {
			Ok(graph) => self.render_graph(graph),
			Err(err) => {
				warn!("rejected graph input: {err}");
				if let Some(window) = web_sys::window() {
					let _ = window.alert_with_message("Invalid JSON");
				}
			}
		}
	}

	/// Rebuild the map from a fresh graph: clear every pin and line, then
	/// resolve each distinct country once through the geocoder, placing pins
	/// as lookups land, drawing edge lines once all endpoints are known, and
	/// finishing with a single fit over everything placed. A resubmission
	/// bumps the epoch and the superseded task stops touching the map.
	pub fn render_graph(&self, graph: Graph) {
		self.graph.set(graph.clone());
		self.menu.set(None);
		let epoch = self.render_epoch.get() + 1;
		self.render_epoch.set(epoch);
		self.map.with(|m| m.clear_overlays());

		let app = self.clone();
		spawn_local(async move {
			let mut resolved: HashMap<String, LatLng> = HashMap::new();
			for country in model::lookup_countries(&graph) {
				let hit = match app.geocoder.lookup(&country).await {
					Ok(Some(hit)) => hit,
					Ok(None) => {
						debug!("no geocode result for {country:?}");
						continue;
					}
					Err(err) => {
						warn!("geocode lookup for {country:?} failed: {err}");
						continue;
					}
				};
				if app.render_epoch.get() != epoch {
					return;
				}
				let ids = model::ids_in_country(&graph, &country);
				if !ids.is_empty() {
					app.map.with(|m| m.add_pin(hit, &country, &ids));
				}
				resolved.insert(country, hit);
			}

			if app.render_epoch.get() != epoch {
				return;
			}
			app.map.with(|m| {
				let mut bounds = LatLngBounds::default();
				for (source, target) in model::resolved_edges(&graph) {
					if let (Some(&a), Some(&b)) = (
						resolved.get(&source.country),
						resolved.get(&target.country),
					) {
						m.add_line(a, b);
						bounds.extend(a);
						bounds.extend(b);
					}
				}
				for pin in m.pins() {
					bounds.extend(pin.pos);
				}
				m.fit_bounds(&bounds);
			});
		});
	}

	/// Open the context menu for a pin's country at the pointer's page
	/// coordinates, replacing any menu already open.
	pub fn open_pin_menu(&self, x: f64, y: f64, country: &str) {
		let node_ids = model::ids_in_country(&self.graph.get_untracked(), country);
		if node_ids.is_empty() {
			return;
		}
		self.menu.set(Some(ContextMenuState { x, y, node_ids }));
	}

	/// Build the detail diagram for a node id chosen from the context menu
	/// and flip the page to the diagram panel.
	pub fn select_node(&self, id: &str) {
		self.menu.set(None);
		let graph = self.graph.get_untracked();
		let (nodes, edges) = model::detail_subgraph(&graph);
		self.diagram.with(|d| d.rebuild(&nodes, &edges, id));
		self.panel.set(ActivePanel::Diagram);
	}

	/// Back to the map; the diagram and legend disappear with the panel flip.
	pub fn close_detail(&self) {
		self.panel.set(ActivePanel::Map);
	}

	pub fn zoom_in(&self) {
		self.map.with(|m| m.zoom_in());
	}

	pub fn zoom_out(&self) {
		self.map.with(|m| m.zoom_out());
	}

	/// Fit the view to the currently placed pins; a pinless map stays put.
	pub fn fit_pins(&self) {
		self.map.with(|m| {
			let bounds = m.pin_bounds();
			m.fit_bounds(&bounds);
		});
	}
}

impl Default for AppContext {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{Edge, Node};

	fn node(id: &str, country: &str) -> Node {
		Node {
			id: id.into(),
			country: country.into(),
		}
	}

	fn app_with_graph() -> AppContext {
		let app = AppContext::new();
		app.graph.set(Graph {
			nodes: vec![
				node("a", "Germany"),
				node("b", "France"),
				node("c", "Germany"),
			],
			edges: vec![Edge {
				source: "a".into(),
				target: "b".into(),
			}],
		});
		app
	}

	#[test]
	fn detail_build_flips_the_panel_and_back_returns_to_the_map() {
		let app = app_with_graph();
		assert_eq!(app.panel.get_untracked(), ActivePanel::Map);
		app.select_node("a");
		assert_eq!(app.panel.get_untracked(), ActivePanel::Diagram);
		app.close_detail();
		assert_eq!(app.panel.get_untracked(), ActivePanel::Map);
	}

	#[test]
	fn menu_selection_highlights_the_chosen_id_and_closes_the_menu() {
		let app = app_with_graph();
		app.open_pin_menu(12.0, 34.0, "Germany");
		let menu = app.menu.get_untracked().expect("menu should open");
		assert_eq!(menu.node_ids, vec!["a", "c"]);

		app.select_node(&menu.node_ids[0]);
		assert_eq!(app.menu.get_untracked(), None);
		let mut selected = Vec::new();
		app.diagram.with(|d| {
			d.graph.visit_nodes(|n| {
				if n.data.user_data.selected {
					selected.push(n.data.user_data.id.clone());
				}
			});
		});
		assert_eq!(selected, vec!["a"]);
	}

	#[test]
	fn opening_a_menu_replaces_the_previous_one() {
		let app = app_with_graph();
		app.open_pin_menu(1.0, 2.0, "Germany");
		app.open_pin_menu(3.0, 4.0, "France");
		let menu = app.menu.get_untracked().expect("menu should open");
		assert_eq!((menu.x, menu.y), (3.0, 4.0));
		assert_eq!(menu.node_ids, vec!["b"]);
	}

	#[test]
	fn unknown_country_opens_no_menu() {
		let app = app_with_graph();
		app.open_pin_menu(1.0, 2.0, "Atlantis");
		assert_eq!(app.menu.get_untracked(), None);
	}
}
