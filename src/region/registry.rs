use std::collections::HashMap;

use super::{RegionId, RegionState};

/// Number of regions currently in each non-default state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateTally {
    pub neutral: usize,
    pub affiliation_a: usize,
    pub affiliation_b: usize,
}

/// Sparse store of region states.
///
/// Only regions that were interacted with have an entry; everything else is
/// `RegionState::Default`. `reset` deletes the entry instead of writing
/// `Default`, so `len` tracks touched regions.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    entries: HashMap<RegionId, RegionState>,
    /// Mutations performed (advances + resets that removed an entry)
    writes: u64,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a region, `Default` when it was never touched
    pub fn get(&self, id: &RegionId) -> RegionState {
        match self.entries.get(id) {
            Some(state) => *state,
            None => RegionState::Default,
        }
    }

    /// Move a region one step along the cycle and return its new state
    pub fn advance(&mut self, id: &RegionId) -> RegionState {
        let entry = self.entries.entry(id.clone()).or_default();
        *entry = entry.next();
        self.writes += 1;
        *entry
    }

    /// Drop a region back to baseline by removing its entry
    pub fn reset(&mut self, id: &RegionId) {
        if self.entries.remove(id).is_some() {
            self.writes += 1;
        }
    }

    /// Number of regions with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, RegionState)> {
        self.entries.iter().map(|(id, state)| (id, *state))
    }

    /// Count regions per assigned state
    pub fn tally(&self) -> StateTally {
        self.entries
            .values()
            .fold(StateTally::default(), |mut tally, state| {
                match state {
                    RegionState::Default => {}
                    RegionState::Neutral => tally.neutral += 1,
                    RegionState::AffiliationA => tally.affiliation_a += 1,
                    RegionState::AffiliationB => tally.affiliation_b += 1,
                }
                tally
            })
    }
}
