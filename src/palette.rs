//! Fill colors for region states.
//!
//! Every state owns a resting and a hover fill. The table is indexed by
//! `[state][hovered]` so the lookup never branches on the state.

use ratatui::style::Color;

use crate::region::RegionState;

/// Region outline color
pub const BORDER_COLOR: Color = Color::Rgb(255, 255, 255);

/// Background for cells outside every region
pub const OCEAN_COLOR: Color = Color::Rgb(173, 216, 230);

const DEFAULT_COLOR: Color = Color::Rgb(185, 185, 185);
const HOVER_COLOR: Color = Color::Rgb(139, 139, 139);
const NEUTRAL_COLOR: Color = Color::Rgb(220, 200, 132);
const NEUTRAL_HOVER_COLOR: Color = Color::Rgb(200, 180, 112);
const AFFILIATION_A_COLOR: Color = Color::Rgb(36, 73, 153);
const AFFILIATION_A_HOVER_COLOR: Color = Color::Rgb(26, 63, 133);
const AFFILIATION_B_COLOR: Color = Color::Rgb(210, 37, 50);
const AFFILIATION_B_HOVER_COLOR: Color = Color::Rgb(190, 27, 40);

/// `[resting, hover]` per state, in `RegionState::ALL` order
const FILL_TABLE: [[Color; 2]; 4] = [
    [DEFAULT_COLOR, HOVER_COLOR],
    [NEUTRAL_COLOR, NEUTRAL_HOVER_COLOR],
    [AFFILIATION_A_COLOR, AFFILIATION_A_HOVER_COLOR],
    [AFFILIATION_B_COLOR, AFFILIATION_B_HOVER_COLOR],
];

/// Display color of a region in `state`, highlighted when `hovered`
#[inline(always)]
pub const fn color_for(state: RegionState, hovered: bool) -> Color {
    FILL_TABLE[state.index()][hovered as usize]
}
