use glam::DVec2;
use std::f64::consts::PI;

/// Zoom range, matching the browser map's scale extent
pub const MIN_ZOOM: f64 = 0.9;
pub const MAX_ZOOM: f64 = 8.0;

const ZOOM_STEP: f64 = 1.5;
const MAX_LAT: f64 = 85.0;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world across the canvas width)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Web Mercator: lon/lat degrees to normalized [0, 1] coordinates
#[inline(always)]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    DVec2::new(
        (lon + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

#[inline(always)]
fn inverse_mercator(p: DVec2) -> (f64, f64) {
    let lon = p.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * p.y)).sinh().atan().to_degrees();
    (lon, lat)
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Whole-world view slightly north of the equator
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) / 2.0
    }

    /// Pan the viewport by a pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = mercator(self.center_lon, self.center_lat)
            + DVec2::new(dx as f64, dy as f64) / self.scale();
        let (lon, lat) = inverse_mercator(center);
        self.center_lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        self.center_lat = lat.clamp(-MAX_LAT, MAX_LAT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor keeping the point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Pixel coordinates back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let offset = (DVec2::new(px as f64, py as f64) - self.half_size()) / self.scale();
        inverse_mercator(mercator(self.center_lon, self.center_lat) + offset)
    }

    /// (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = (mercator(lon, lat) - mercator(self.center_lon, self.center_lat)) * self.scale()
            + self.half_size();
        (p.x as i32, p.y as i32)
    }

    /// Rough bounding box check for a projected segment
    pub fn segment_might_be_visible(&self, a: (i32, i32), b: (i32, i32)) -> bool {
        a.0.max(b.0) >= 0
            && a.0.min(b.0) < self.width as i32
            && a.1.max(b.1) >= 0
            && a.1.min(b.1) < self.height as i32
    }
}
