use glam::DVec2;

use crate::braille::BrailleCanvas;
use crate::region::RegionId;

/// Closed ring of (lon, lat) vertices
pub type Ring = Vec<DVec2>;

/// Axis-aligned bounds in lon/lat degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: DVec2::splat(f64::INFINITY),
        max: DVec2::splat(f64::NEG_INFINITY),
    };

    pub fn extend(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline(always)]
    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

/// A named region with its boundary rings.
///
/// Rings from every polygon (exteriors and holes) are kept in one list;
/// containment uses the even-odd rule across all of them.
#[derive(Clone, Debug)]
pub struct RegionShape {
    pub id: RegionId,
    pub name: String,
    pub rings: Vec<Ring>,
    pub bounds: Bounds,
}

impl RegionShape {
    pub fn new(id: RegionId, name: impl Into<String>, rings: Vec<Ring>) -> Self {
        let bounds = rings_bounds(&rings);
        Self {
            id,
            name: name.into(),
            rings,
            bounds,
        }
    }

    /// Append rings from another polygon with the same id
    pub fn merge(&mut self, rings: Vec<Ring>) {
        for p in rings.iter().flatten() {
            self.bounds.extend(*p);
        }
        self.rings.extend(rings);
    }

    /// Point-in-region test (even-odd over all rings)
    pub fn contains(&self, p: DVec2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        self.rings
            .iter()
            .filter(|ring| ring_crosses(ring, p))
            .count()
            % 2
            == 1
    }

    /// Where to put the region's label: centroid of its largest ring
    pub fn label_anchor(&self) -> DVec2 {
        self.rings
            .iter()
            .map(|ring| (ring_area(ring).abs(), ring))
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .and_then(|(area, ring)| (area > 0.0).then(|| ring_centroid(ring)))
            .unwrap_or_else(|| self.bounds.center())
    }
}

fn rings_bounds(rings: &[Ring]) -> Bounds {
    let mut bounds = Bounds::EMPTY;
    for p in rings.iter().flatten() {
        bounds.extend(*p);
    }
    bounds
}

/// Ray cast to +x: true if the ray from `p` crosses `ring` an odd number of times
fn ring_crosses(ring: &[DVec2], p: DVec2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Signed shoelace area
fn ring_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

fn ring_centroid(ring: &[DVec2]) -> DVec2 {
    let area = ring_area(ring);
    let n = ring.len();
    let mut c = DVec2::ZERO;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        c += (a + b) * a.perp_dot(b);
    }
    c / (6.0 * area)
}

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, from: (i32, i32), to: (i32, i32)) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
