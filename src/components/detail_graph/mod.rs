mod component;
mod render;
mod state;

pub use component::DetailGraphCanvas;
pub use state::{DiagramHandle, DiagramState};
