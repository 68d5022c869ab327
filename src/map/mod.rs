mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use geometry::{Bounds, RegionShape, Ring};
pub use projection::{Viewport, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{DisplaySettings, MapLayers, MapRenderer};
pub use spatial::RegionIndex;
