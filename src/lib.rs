//! Terminal world map where each region is clicked through a small cycle of
//! affiliation states, each drawn with its own fill color.
//!
//! The state model lives in [`region`] and [`palette`]; [`dispatch`] applies
//! pointer gestures to it. Everything else loads, projects and draws the map.

pub mod app;
pub mod braille;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod map;
pub mod palette;
pub mod region;
pub mod ui;
