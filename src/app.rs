use crate::dispatch::{Dispatcher, Gesture, Modifiers};
use crate::map::{MapRenderer, Viewport};
use crate::region::{RegionId, RegionRegistry, RegionState};

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    dispatcher: Dispatcher,
    pub should_quit: bool,
    /// Map fills the whole terminal (no border or status bar)
    pub fullscreen: bool,
    /// Terminal size in cells
    term_size: (usize, usize),
    /// Last mouse position for drag tracking
    last_mouse: Option<(u16, u16)>,
    /// Whether the current left press turned into a drag
    dragged: bool,
    /// Region under the pointer
    hovered: Option<RegionId>,
    /// Last cell the pointer was seen at
    pointer: Option<(u16, u16)>,
}

impl App {
    pub fn new(width: usize, height: usize, map_renderer: MapRenderer) -> Self {
        let mut app = Self {
            viewport: Viewport::world(0, 0),
            map_renderer,
            dispatcher: Dispatcher::new(),
            should_quit: false,
            fullscreen: false,
            term_size: (width, height),
            last_mouse: None,
            dragged: false,
            hovered: None,
            pointer: None,
        };
        app.fit_viewport();
        app
    }

    pub fn registry(&self) -> &RegionRegistry {
        self.dispatcher.registry()
    }

    pub fn hovered(&self) -> Option<&RegionId> {
        self.hovered.as_ref()
    }

    /// Top-left terminal cell of the map area
    pub fn map_origin(&self) -> (u16, u16) {
        if self.fullscreen {
            (0, 0)
        } else {
            (1, 1)
        }
    }

    /// Map area size in character cells
    pub fn map_size(&self) -> (usize, usize) {
        let (width, height) = self.term_size;
        if self.fullscreen {
            (width, height)
        } else {
            // 2 for the border, plus 1 row for the status bar
            (width.saturating_sub(2), height.saturating_sub(3))
        }
    }

    /// Braille gives 2x4 pixels per character
    fn fit_viewport(&mut self) {
        let (cols, rows) = self.map_size();
        self.viewport.width = cols * 2;
        self.viewport.height = rows * 4;
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.term_size = (width, height);
        self.fit_viewport();
        self.refresh_hover();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.fit_viewport();
        self.refresh_hover();
        tracing::debug!(fullscreen = self.fullscreen, "fullscreen toggled");
    }

    /// Back to the whole-world view; region states are kept
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
        self.refresh_hover();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.refresh_hover();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.refresh_hover();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.refresh_hover();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.screen_to_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
        self.hover_at(col, row);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.screen_to_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
        self.hover_at(col, row);
    }

    /// The map moved under a still pointer; re-check what it is over
    fn refresh_hover(&mut self) {
        if let Some((col, row)) = self.pointer {
            self.hover_at(col, row);
        }
    }

    /// Terminal cell to the braille pixel at its center, `None` outside the map
    pub fn screen_to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let (ox, oy) = self.map_origin();
        let (cols, rows) = self.map_size();
        let cx = col.checked_sub(ox)? as usize;
        let cy = row.checked_sub(oy)? as usize;
        (cx < cols && cy < rows).then(|| (cx as i32 * 2 + 1, cy as i32 * 4 + 2))
    }

    /// Region drawn at a terminal cell
    pub fn region_under(&self, col: u16, row: u16) -> Option<RegionId> {
        let (px, py) = self.screen_to_pixel(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        self.map_renderer
            .region_at(lon, lat)
            .map(|shape| shape.id.clone())
    }

    /// Apply a gesture to the region under a cell
    fn gesture_at(&mut self, col: u16, row: u16, make: fn(RegionId) -> Gesture) {
        if let Some(region) = self.region_under(col, row) {
            let gesture = make(region);
            self.dispatcher.dispatch(&gesture, &mut self.map_renderer);
        }
    }

    /// Click on a region: cycle it, or reset it when shift is held
    pub fn activate_at(&mut self, col: u16, row: u16, modifiers: Modifiers) {
        if modifiers.shift {
            self.reset_at(col, row);
        } else {
            self.gesture_at(col, row, Gesture::activate);
        }
    }

    pub fn reset_at(&mut self, col: u16, row: u16) {
        self.gesture_at(col, row, Gesture::reset);
    }

    /// Track the pointer, emitting leave/enter when the region under it changes
    pub fn hover_at(&mut self, col: u16, row: u16) {
        self.pointer = Some((col, row));
        let under = self.region_under(col, row);
        if under == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.dispatcher
                .dispatch(&Gesture::hover_leave(previous), &mut self.map_renderer);
        }
        if let Some(region) = &under {
            self.dispatcher
                .dispatch(&Gesture::hover_enter(region.clone()), &mut self.map_renderer);
        }
        self.hovered = under;
    }

    /// Left button pressed
    pub fn press(&mut self, col: u16, row: u16) {
        self.pointer = Some((col, row));
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Mouse dragged with the left button held
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        self.pointer = Some((col, row));
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as i32 - col as i32) * 2;
            let dy = (last_y as i32 - row as i32) * 4;
            if dx != 0 || dy != 0 {
                self.pan(dx, dy);
                self.dragged = true;
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Left button released: a press without drag is a click
    pub fn release(&mut self, col: u16, row: u16, modifiers: Modifiers) {
        let clicked = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if clicked {
            self.activate_at(col, row, modifiers);
        } else {
            self.hover_at(col, row);
        }
    }

    /// State and name of the hovered region, for the status bar
    pub fn hovered_summary(&self) -> Option<(&str, RegionState)> {
        let id = self.hovered.as_ref()?;
        let name = self
            .map_renderer
            .shape(id)
            .map(|shape| shape.name.as_str())
            .unwrap_or(id.as_str());
        Some((name, self.registry().get(id)))
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RegionShape;
    use crate::palette::color_for;
    use glam::DVec2;

    // Screen cells for an 82x23 terminal with the viewport centered on (0, 0)
    const EAST_CELL: (u16, u16) = (48, 11);
    const WEST_CELL: (u16, u16) = (32, 11);
    const OCEAN_CELL: (u16, u16) = (40, 11);

    fn rect(id: &str, min: (f64, f64), max: (f64, f64)) -> RegionShape {
        RegionShape::new(
            id.into(),
            id,
            vec![vec![
                DVec2::new(min.0, min.1),
                DVec2::new(max.0, min.1),
                DVec2::new(max.0, max.1),
                DVec2::new(min.0, max.1),
            ]],
        )
    }

    fn test_app() -> App {
        let renderer = MapRenderer::new(vec![
            rect("WEST", (-60.0, -30.0), (-10.0, 30.0)),
            rect("EAST", (10.0, -30.0), (60.0, 30.0)),
        ]);
        let mut app = App::new(82, 23, renderer);
        app.viewport = Viewport::new(0.0, 0.0, 1.0, app.viewport.width, app.viewport.height);
        app
    }

    #[test]
    fn test_map_size_and_fullscreen() {
        let mut app = test_app();
        assert_eq!(app.map_size(), (80, 20));
        assert_eq!((app.viewport.width, app.viewport.height), (160, 80));
        app.toggle_fullscreen();
        assert_eq!(app.map_origin(), (0, 0));
        assert_eq!(app.map_size(), (82, 23));
        assert_eq!((app.viewport.width, app.viewport.height), (164, 92));
        app.toggle_fullscreen();
        assert_eq!(app.map_size(), (80, 20));
    }

    #[test]
    fn test_region_under() {
        let app = test_app();
        assert_eq!(app.region_under(EAST_CELL.0, EAST_CELL.1), Some("EAST".into()));
        assert_eq!(app.region_under(WEST_CELL.0, WEST_CELL.1), Some("WEST".into()));
        assert_eq!(app.region_under(OCEAN_CELL.0, OCEAN_CELL.1), None);
        // Border column is outside the map
        assert_eq!(app.screen_to_pixel(0, 5), None);
    }

    #[test]
    fn test_click_cycles_and_shift_click_resets() {
        let mut app = test_app();
        let east = RegionId::from("EAST");
        let (col, row) = EAST_CELL;

        app.press(col, row);
        app.release(col, row, Modifiers::NONE);
        assert_eq!(app.registry().get(&east), RegionState::Neutral);
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::Neutral, false)
        );

        app.press(col, row);
        app.release(col, row, Modifiers::SHIFT);
        assert_eq!(app.registry().get(&east), RegionState::Default);
        assert!(app.registry().is_empty());
    }

    #[test]
    fn test_right_click_resets() {
        let mut app = test_app();
        let west = RegionId::from("WEST");
        app.activate_at(WEST_CELL.0, WEST_CELL.1, Modifiers::NONE);
        app.activate_at(WEST_CELL.0, WEST_CELL.1, Modifiers::NONE);
        assert_eq!(app.registry().get(&west), RegionState::AffiliationA);
        app.reset_at(WEST_CELL.0, WEST_CELL.1);
        assert_eq!(app.registry().get(&west), RegionState::Default);
    }

    #[test]
    fn test_drag_does_not_activate() {
        let mut app = test_app();
        let (col, row) = EAST_CELL;
        app.press(col, row);
        app.handle_drag(col + 3, row);
        app.release(col + 3, row, Modifiers::NONE);
        assert!(app.registry().is_empty());
        assert!(app.viewport.center_lon < 0.0);
    }

    #[test]
    fn test_click_on_ocean_is_ignored() {
        let mut app = test_app();
        app.activate_at(OCEAN_CELL.0, OCEAN_CELL.1, Modifiers::NONE);
        assert!(app.registry().is_empty());
        assert_eq!(app.registry().writes(), 0);
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut app = test_app();
        let east = RegionId::from("EAST");
        let west = RegionId::from("WEST");

        app.hover_at(EAST_CELL.0, EAST_CELL.1);
        assert_eq!(app.hovered(), Some(&east));
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::Default, true)
        );

        app.hover_at(WEST_CELL.0, WEST_CELL.1);
        assert_eq!(app.hovered(), Some(&west));
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::Default, false)
        );
        assert_eq!(
            app.map_renderer.painted_color(&west),
            color_for(RegionState::Default, true)
        );

        app.hover_at(OCEAN_CELL.0, OCEAN_CELL.1);
        assert_eq!(app.hovered(), None);
        assert_eq!(
            app.map_renderer.painted_color(&west),
            color_for(RegionState::Default, false)
        );
        assert_eq!(app.registry().writes(), 0);
    }

    #[test]
    fn test_hover_shows_state_hover_color() {
        let mut app = test_app();
        let east = RegionId::from("EAST");
        for _ in 0..3 {
            app.activate_at(EAST_CELL.0, EAST_CELL.1, Modifiers::NONE);
        }
        app.hover_at(EAST_CELL.0, EAST_CELL.1);
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::AffiliationB, true)
        );
        assert_eq!(app.hovered_summary(), Some(("EAST", RegionState::AffiliationB)));
        app.hover_at(OCEAN_CELL.0, OCEAN_CELL.1);
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::AffiliationB, false)
        );
    }

    #[test]
    fn test_keyboard_pan_moves_hover_off_region() {
        let mut app = test_app();
        let east = RegionId::from("EAST");
        app.hover_at(EAST_CELL.0, EAST_CELL.1);
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::Default, true)
        );

        for _ in 0..10 {
            app.pan(-10, 0);
        }
        assert_eq!(app.region_under(EAST_CELL.0, EAST_CELL.1), None);
        assert_eq!(app.hovered(), None);
        assert_eq!(app.hovered_summary(), None);
        assert_eq!(
            app.map_renderer.painted_color(&east),
            color_for(RegionState::Default, false)
        );
        assert_eq!(app.registry().writes(), 0);
    }

    #[test]
    fn test_hover_follows_layout_changes() {
        let mut app = test_app();
        app.hover_at(WEST_CELL.0, WEST_CELL.1);
        for step in 0..6 {
            match step % 3 {
                0 => app.toggle_fullscreen(),
                1 => app.zoom_in(),
                _ => app.resize(60, 20),
            }
            assert_eq!(
                app.hovered().cloned(),
                app.region_under(WEST_CELL.0, WEST_CELL.1)
            );
        }
    }

    #[test]
    fn test_reset_view_keeps_registry() {
        let mut app = test_app();
        app.activate_at(EAST_CELL.0, EAST_CELL.1, Modifiers::NONE);
        app.zoom_in();
        app.reset_view();
        assert_eq!(app.viewport.zoom, 1.0);
        assert_eq!(app.registry().len(), 1);
    }
}
