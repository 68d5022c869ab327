use std::collections::HashMap;

use glam::DVec2;

use crate::map::geometry::Bounds;

/// Default cell size in degrees
pub const DEFAULT_CELL_SIZE: f64 = 10.0;

/// Spatial hash over region bounds.
///
/// Each region index is stored in every cell its bounding box overlaps, so a
/// point query never misses a region; candidates still need an exact
/// containment test.
pub struct RegionIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl RegionIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let c = (p / self.cell_size).floor();
        (c.x as i32, c.y as i32)
    }

    /// Build from region bounds, in region order
    pub fn build<'a>(bounds: impl Iterator<Item = &'a Bounds>, cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (idx, b) in bounds.enumerate() {
            if b.min.x > b.max.x || b.min.y > b.max.y {
                continue;
            }
            let (min_x, min_y) = index.to_cell(b.min);
            let (max_x, max_y) = index.to_cell(b.max);
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    index.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Regions whose bounds may contain `p`
    pub fn candidates(&self, p: DVec2) -> &[usize] {
        self.cells
            .get(&self.to_cell(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
