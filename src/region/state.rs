/// Categorical state a region can be clicked through.
///
/// The declaration order is the cycle order used by [`RegionState::next`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RegionState {
    #[default]
    Default,
    Neutral,
    AffiliationA,
    AffiliationB,
}

impl RegionState {
    /// All states in cycle order
    pub const ALL: [RegionState; 4] = [
        RegionState::Default,
        RegionState::Neutral,
        RegionState::AffiliationA,
        RegionState::AffiliationB,
    ];

    /// The state one click further along the cycle.
    /// Default -> Neutral -> AffiliationA -> AffiliationB -> Default
    pub const fn next(self) -> Self {
        match self {
            RegionState::Default => RegionState::Neutral,
            RegionState::Neutral => RegionState::AffiliationA,
            RegionState::AffiliationA => RegionState::AffiliationB,
            RegionState::AffiliationB => RegionState::Default,
        }
    }

    /// Row of this state in the color table
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable label for the status bar
    pub const fn label(self) -> &'static str {
        match self {
            RegionState::Default => "Unassigned",
            RegionState::Neutral => "Neutral",
            RegionState::AffiliationA => "Democrat",
            RegionState::AffiliationB => "Republican",
        }
    }
}
