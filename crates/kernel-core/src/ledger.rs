use contracts::{WorldDelta, WorldState};

/// Running world counters. Deltas add field-wise with no clamping; the i32
/// bounds saturate instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldLedger {
    state: WorldState,
}

impl WorldLedger {
    pub fn new(state: WorldState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn apply_delta(&mut self, delta: &WorldDelta) {
        let state = &mut self.state;
        state.reputation = state.reputation.saturating_add(delta.reputation);
        state.stability = state.stability.saturating_add(delta.stability);
        state.budget = state.budget.saturating_add(delta.budget);
        state.influence = state.influence.saturating_add(delta.influence);
        state.casualties = state.casualties.saturating_add(delta.casualties);
    }

    pub fn reset(&mut self, state: WorldState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_accumulate_without_clamping() {
        let mut ledger = WorldLedger::default();
        ledger.apply_delta(&WorldDelta {
            reputation: -80,
            stability: 3,
            budget: 250,
            influence: 1,
            casualties: 2,
        });
        ledger.apply_delta(&WorldDelta {
            stability: -60,
            ..WorldDelta::default()
        });
        assert_eq!(
            *ledger.state(),
            WorldState {
                reputation: -30,
                stability: -7,
                budget: 1250,
                influence: 1,
                casualties: 2,
            }
        );
    }

    #[test]
    fn zero_delta_is_identity() {
        let mut ledger = WorldLedger::default();
        ledger.apply_delta(&WorldDelta::default());
        assert_eq!(*ledger.state(), WorldState::default());
    }

    #[test]
    fn extreme_budget_saturates() {
        let mut ledger = WorldLedger::new(WorldState {
            budget: i32::MAX - 1,
            ..WorldState::default()
        });
        ledger.apply_delta(&WorldDelta {
            budget: 10,
            ..WorldDelta::default()
        });
        assert_eq!(ledger.state().budget, i32::MAX);
    }
}
