//! Focus-area vocabulary for match analysis.
//!
//! A closed set of tactical aspects the user can steer the analysis toward.
//! Selection is a set: order of selection does not matter, and each area
//! appears at most once in the generated prompt.

use serde::{Deserialize, Serialize};

/// A tactical aspect the inference prompt should emphasise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusArea {
    PressingTraps,
    CounterAttacking,
    LowBlockIntegrity,
    SpaceCreation,
}

impl FocusArea {
    /// Every focus area, in display order.
    pub const ALL: [FocusArea; 4] = [
        FocusArea::PressingTraps,
        FocusArea::CounterAttacking,
        FocusArea::LowBlockIntegrity,
        FocusArea::SpaceCreation,
    ];

    /// Human-readable label shown in the UI and embedded in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::PressingTraps => "Pressing Traps",
            FocusArea::CounterAttacking => "Counter-Attacking",
            FocusArea::LowBlockIntegrity => "Low Block Integrity",
            FocusArea::SpaceCreation => "Space Creation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_area_once() {
        let mut seen = std::collections::HashSet::new();
        for area in FocusArea::ALL {
            assert!(seen.insert(area), "duplicate in ALL: {area:?}");
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn labels_match_vocabulary() {
        assert_eq!(FocusArea::PressingTraps.label(), "Pressing Traps");
        assert_eq!(FocusArea::CounterAttacking.label(), "Counter-Attacking");
        assert_eq!(FocusArea::LowBlockIntegrity.label(), "Low Block Integrity");
        assert_eq!(FocusArea::SpaceCreation.label(), "Space Creation");
    }
}
