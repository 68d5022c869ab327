//! Gesture handling for map regions.
//!
//! A gesture on a region updates the [`RegionRegistry`] (activations only) and
//! always ends with exactly one repaint of that region through a
//! [`RegionPainter`].

use ratatui::style::Color;

use crate::palette::color_for;
use crate::region::{RegionId, RegionRegistry, RegionState};

/// Something that can re-color a single region shape
pub trait RegionPainter {
    fn repaint(&mut self, region: &RegionId, color: Color);
}

/// What the pointer did on a region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Activate,
    HoverEnter,
    HoverLeave,
}

/// Modifier keys held during a gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// One discrete input event targeting a region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gesture {
    pub region: RegionId,
    pub kind: GestureKind,
    pub modifiers: Modifiers,
}

impl Gesture {
    pub fn activate(region: RegionId) -> Self {
        Self {
            region,
            kind: GestureKind::Activate,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn reset(region: RegionId) -> Self {
        Self {
            region,
            kind: GestureKind::Activate,
            modifiers: Modifiers::SHIFT,
        }
    }

    pub fn hover_enter(region: RegionId) -> Self {
        Self {
            region,
            kind: GestureKind::HoverEnter,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn hover_leave(region: RegionId) -> Self {
        Self {
            region,
            kind: GestureKind::HoverLeave,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Owns the registry and applies gestures to it
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: RegionRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Apply a gesture and repaint its region. Returns the painted color.
    pub fn dispatch<P>(&mut self, gesture: &Gesture, painter: &mut P) -> Color
    where
        P: RegionPainter + ?Sized,
    {
        let region = &gesture.region;
        let color = match gesture.kind {
            GestureKind::Activate if gesture.modifiers.shift => {
                self.registry.reset(region);
                tracing::debug!(%region, "region reset");
                color_for(RegionState::Default, false)
            }
            GestureKind::Activate => {
                let state = self.registry.advance(region);
                tracing::debug!(%region, state = state.label(), "region advanced");
                color_for(state, false)
            }
            GestureKind::HoverEnter => color_for(self.registry.get(region), true),
            GestureKind::HoverLeave => color_for(self.registry.get(region), false),
        };

        painter.repaint(region, color);
        color
    }
}
