use std::collections::HashMap;

use glam::DVec2;
use ratatui::style::Color;
use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::dispatch::RegionPainter;
use crate::map::geometry::{draw_line, RegionShape};
use crate::map::projection::Viewport;
use crate::map::spatial::{RegionIndex, DEFAULT_CELL_SIZE};
use crate::palette::color_for;
use crate::region::{RegionId, RegionState};

/// Minimum projected width (in characters) before a region gets a label
const LABEL_MIN_CHARS: i32 = 6;

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_borders: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_borders: true,
            show_labels: true,
        }
    }
}

/// One rendered frame of the map, in character cells
pub struct MapLayers {
    cols: usize,
    /// Fill color per cell, `None` for ocean
    fills: Vec<Option<Color>>,
    pub outlines: BrailleCanvas,
    /// (column, row, text) already centered on the region anchor
    pub labels: Vec<(u16, u16, String)>,
}

impl MapLayers {
    pub fn fill(&self, cx: usize, cy: usize) -> Option<Color> {
        if cx >= self.cols {
            return None;
        }
        self.fills.get(cy * self.cols + cx).copied().flatten()
    }
}

/// Draws region shapes and remembers the last color painted for each.
///
/// The painted colors are a cache for drawing only; region state lives in the
/// registry.
pub struct MapRenderer {
    shapes: Vec<RegionShape>,
    by_id: HashMap<RegionId, usize>,
    index: RegionIndex,
    painted: HashMap<RegionId, Color>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new(shapes: Vec<RegionShape>) -> Self {
        let by_id = shapes
            .iter()
            .enumerate()
            .map(|(idx, shape)| (shape.id.clone(), idx))
            .collect();
        let index = RegionIndex::build(shapes.iter().map(|s| &s.bounds), DEFAULT_CELL_SIZE);
        Self {
            shapes,
            by_id,
            index,
            painted: HashMap::new(),
            settings: DisplaySettings::default(),
        }
    }

    pub fn shape(&self, id: &RegionId) -> Option<&RegionShape> {
        self.by_id.get(id).map(|&idx| &self.shapes[idx])
    }

    /// Topmost region containing (lon, lat)
    pub fn region_at(&self, lon: f64, lat: f64) -> Option<&RegionShape> {
        let p = DVec2::new((lon + 180.0).rem_euclid(360.0) - 180.0, lat);
        self.index
            .candidates(p)
            .iter()
            .rev()
            .map(|&idx| &self.shapes[idx])
            .find(|shape| shape.contains(p))
    }

    /// Color the region was last painted with (resting default until touched)
    pub fn painted_color(&self, id: &RegionId) -> Color {
        self.painted
            .get(id)
            .copied()
            .unwrap_or(color_for(RegionState::Default, false))
    }

    /// Render fills, outlines and labels for a `cols` x `rows` character area
    pub fn render(&self, cols: usize, rows: usize, viewport: &Viewport) -> MapLayers {
        let mut layers = MapLayers {
            cols,
            fills: vec![None; cols * rows],
            outlines: BrailleCanvas::new(cols, rows),
            labels: Vec::new(),
        };
        if cols == 0 || rows == 0 {
            return layers;
        }

        // Sample the region under the center of every cell
        layers
            .fills
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(cy, row)| {
                for (cx, fill) in row.iter_mut().enumerate() {
                    let (lon, lat) = viewport.unproject(cx as i32 * 2 + 1, cy as i32 * 4 + 2);
                    *fill = self
                        .region_at(lon, lat)
                        .map(|shape| self.painted_color(&shape.id));
                }
            });

        for shape in &self.shapes {
            let Some((min, max)) = self.projected_extent(shape, viewport) else {
                continue;
            };

            if self.settings.show_borders {
                for ring in &shape.rings {
                    draw_ring(&mut layers.outlines, ring, viewport);
                }
            }

            if self.settings.show_labels && (max.0 - min.0) / 2 >= LABEL_MIN_CHARS {
                let anchor = shape.label_anchor();
                let (px, py) = viewport.project(anchor.x, anchor.y);
                let half = shape.name.chars().count() as i32 / 2;
                let (col, row) = (px / 2 - half, py / 4);
                if col >= 0 && row >= 0 && (col as usize) < cols && (row as usize) < rows {
                    layers.labels.push((col as u16, row as u16, shape.name.clone()));
                }
            }
        }

        layers
    }

    /// Projected pixel bounds, `None` when entirely off screen
    fn projected_extent(
        &self,
        shape: &RegionShape,
        viewport: &Viewport,
    ) -> Option<((i32, i32), (i32, i32))> {
        let (x0, y0) = viewport.project(shape.bounds.min.x, shape.bounds.max.y);
        let (x1, y1) = viewport.project(shape.bounds.max.x, shape.bounds.min.y);
        viewport
            .segment_might_be_visible((x0, y0), (x1, y1))
            .then_some(((x0, y0), (x1, y1)))
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

impl RegionPainter for MapRenderer {
    fn repaint(&mut self, region: &RegionId, color: Color) {
        if self.by_id.contains_key(region) {
            self.painted.insert(region.clone(), color);
        } else {
            tracing::warn!(%region, "repaint for unknown region ignored");
        }
    }
}

/// Draw a ring's edges, skipping segments that wrap across the antimeridian
fn draw_ring(canvas: &mut BrailleCanvas, ring: &[DVec2], viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;
    for p in ring.iter().chain(ring.first()) {
        let cur = viewport.project(p.x, p.y);
        if let Some(last) = prev {
            let dist = ((cur.0 - last.0).abs() + (cur.1 - last.1).abs()) as usize;
            if dist < viewport.width && viewport.segment_might_be_visible(last, cur) {
                draw_line(canvas, last, cur);
            }
        }
        prev = Some(cur);
    }
}
