pub mod context_menu;
pub mod detail_graph;
pub mod legend;
pub mod sidebar;
pub mod tile_map;
pub mod toolbar;
