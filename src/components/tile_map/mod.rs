mod component;
mod render;
pub mod scale;
mod state;

pub use component::TileMapCanvas;
pub use state::{LatLngBounds, MapHandle, MapState, Pin};
