//! Background crisis escalation driven by quest outcomes.
//!
//! Failures accumulate in a decaying window and wake a dormant crisis; an
//! awake crisis climbs one phase every three days. Three successes in a single
//! day push it back down one phase. Reaching Catastrophe (or Resolved) ends it
//! for good.

use contracts::{CrisisPhase, CrisisState, QuestOutcome, QuestResult, WorldDelta, DEFAULT_CRISIS_EVENT_ID};
use tracing::info;

pub const TRIGGER_FAILURES: i32 = 3;
pub const DAYS_PER_ESCALATION: i32 = 3;
pub const EASING_SUCCESSES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisTransition {
    pub from: CrisisPhase,
    pub to: CrisisPhase,
}

impl CrisisTransition {
    pub fn is_escalation(&self) -> bool {
        self.to > self.from
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrisisTracker {
    state: CrisisState,
    successes_today: u32,
}

impl CrisisTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a persisted state, repairing what an older or hand-edited save
    /// may carry: blank id, negative counters, or a terminal phase whose
    /// finished flag was lost.
    pub fn load(saved: CrisisState) -> Self {
        let event_id = if saved.event_id.trim().is_empty() {
            DEFAULT_CRISIS_EVENT_ID.to_string()
        } else {
            saved.event_id
        };
        Self {
            state: CrisisState {
                event_id,
                phase: saved.phase,
                days_in_phase: saved.days_in_phase.max(0),
                failure_window: saved.failure_window.max(0),
                finished: saved.finished || saved.phase.is_terminal(),
            },
            successes_today: 0,
        }
    }

    pub fn state(&self) -> &CrisisState {
        &self.state
    }

    pub fn phase(&self) -> CrisisPhase {
        self.state.phase
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn successes_today(&self) -> u32 {
        self.successes_today
    }

    pub fn on_day_start(&mut self) {
        self.successes_today = 0;
        if self.state.finished {
            return;
        }
        self.state.failure_window = (self.state.failure_window - 1).max(0);
        if self.state.phase != CrisisPhase::Dormant {
            self.state.days_in_phase = self.state.days_in_phase.saturating_add(1);
        }
    }

    pub fn register_results(&mut self, results: &[QuestResult]) {
        if self.state.finished {
            return;
        }
        for result in results {
            match result.outcome {
                QuestOutcome::Fail => {
                    self.state.failure_window = self.state.failure_window.saturating_add(1)
                }
                QuestOutcome::Success => self.successes_today = self.successes_today.saturating_add(1),
            }
        }
    }

    /// Applies at most one rule, in priority order: ease on a strong day,
    /// wake on accumulated failures, then time-based escalation.
    pub fn try_trigger_or_advance(&mut self) -> Option<CrisisTransition> {
        if self.state.finished {
            return None;
        }

        let from = self.state.phase;
        let to = if self.successes_today >= EASING_SUCCESSES {
            step_down(from)
        } else {
            match from {
                CrisisPhase::Dormant if self.state.failure_window >= TRIGGER_FAILURES => {
                    CrisisPhase::Active
                }
                CrisisPhase::Active if self.state.days_in_phase >= DAYS_PER_ESCALATION => {
                    CrisisPhase::Escalating
                }
                CrisisPhase::Escalating if self.state.days_in_phase >= DAYS_PER_ESCALATION => {
                    CrisisPhase::Critical
                }
                CrisisPhase::Critical if self.state.days_in_phase >= DAYS_PER_ESCALATION => {
                    CrisisPhase::Catastrophe
                }
                _ => return None,
            }
        };

        self.state.phase = to;
        self.state.days_in_phase = 0;
        if to == CrisisPhase::Catastrophe {
            self.state.finished = true;
        }

        if from == to {
            return None;
        }
        info!(
            event_id = %self.state.event_id,
            from = ?from,
            to = ?to,
            finished = self.state.finished,
            "crisis phase changed"
        );
        Some(CrisisTransition { from, to })
    }

    pub fn daily_delta(&self) -> WorldDelta {
        match self.state.phase {
            CrisisPhase::Active => WorldDelta {
                stability: -1,
                ..WorldDelta::default()
            },
            CrisisPhase::Escalating => WorldDelta {
                stability: -2,
                casualties: 1,
                ..WorldDelta::default()
            },
            CrisisPhase::Critical => WorldDelta {
                stability: -3,
                casualties: 2,
                reputation: -2,
                ..WorldDelta::default()
            },
            _ => WorldDelta::default(),
        }
    }
}

fn step_down(phase: CrisisPhase) -> CrisisPhase {
    match phase {
        CrisisPhase::Critical => CrisisPhase::Escalating,
        CrisisPhase::Escalating => CrisisPhase::Active,
        CrisisPhase::Active => CrisisPhase::Dormant,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: QuestOutcome) -> QuestResult {
        QuestResult {
            quest_id: "Q0001".to_string(),
            outcome,
            final_success_chance: 50,
            top_reasons: Vec::new(),
            delta: WorldDelta::default(),
        }
    }

    fn tracker_in(phase: CrisisPhase, days_in_phase: i32) -> CrisisTracker {
        CrisisTracker::load(CrisisState {
            phase,
            days_in_phase,
            ..CrisisState::default()
        })
    }

    #[test]
    fn three_failures_wake_a_dormant_crisis() {
        let mut tracker = CrisisTracker::new();
        tracker.register_results(&[result(QuestOutcome::Fail), result(QuestOutcome::Fail)]);
        assert_eq!(tracker.try_trigger_or_advance(), None);
        tracker.register_results(&[result(QuestOutcome::Fail)]);
        assert_eq!(tracker.state().failure_window, 3);
        assert_eq!(
            tracker.try_trigger_or_advance(),
            Some(CrisisTransition {
                from: CrisisPhase::Dormant,
                to: CrisisPhase::Active
            })
        );
        assert_eq!(tracker.state().days_in_phase, 0);
    }

    #[test]
    fn day_start_decays_window_and_ages_awake_phases() {
        let mut tracker = CrisisTracker::load(CrisisState {
            failure_window: 1,
            ..CrisisState::default()
        });
        tracker.on_day_start();
        tracker.on_day_start();
        assert_eq!(tracker.state().failure_window, 0);
        assert_eq!(tracker.state().days_in_phase, 0);

        let mut awake = tracker_in(CrisisPhase::Active, 0);
        awake.on_day_start();
        assert_eq!(awake.state().days_in_phase, 1);
    }

    #[test]
    fn escalation_climbs_one_step_per_call() {
        let mut tracker = tracker_in(CrisisPhase::Active, 3);
        let step = tracker.try_trigger_or_advance().expect("escalates");
        assert!(step.is_escalation());
        assert_eq!(tracker.phase(), CrisisPhase::Escalating);
        assert_eq!(tracker.try_trigger_or_advance(), None);
    }

    #[test]
    fn strong_day_eases_exactly_one_phase() {
        let mut tracker = tracker_in(CrisisPhase::Critical, 5);
        tracker.register_results(&[
            result(QuestOutcome::Success),
            result(QuestOutcome::Success),
            result(QuestOutcome::Success),
        ]);
        let step = tracker.try_trigger_or_advance().expect("eases");
        assert!(!step.is_escalation());
        assert_eq!(tracker.phase(), CrisisPhase::Escalating);
        assert_eq!(tracker.state().days_in_phase, 0);
    }

    #[test]
    fn easing_while_dormant_only_resets_days() {
        let mut tracker = CrisisTracker::load(CrisisState {
            failure_window: 5,
            ..CrisisState::default()
        });
        tracker.register_results(&[
            result(QuestOutcome::Success),
            result(QuestOutcome::Success),
            result(QuestOutcome::Success),
        ]);
        // Easing outranks the failure trigger.
        assert_eq!(tracker.try_trigger_or_advance(), None);
        assert_eq!(tracker.phase(), CrisisPhase::Dormant);
    }

    #[test]
    fn catastrophe_latches_and_freezes_state() {
        let mut tracker = tracker_in(CrisisPhase::Critical, 3);
        tracker.register_results(&[result(QuestOutcome::Fail)]);
        assert_eq!(
            tracker.try_trigger_or_advance().map(|step| step.to),
            Some(CrisisPhase::Catastrophe)
        );
        assert!(tracker.is_finished());

        let frozen = tracker.state().clone();
        for _ in 0..5 {
            tracker.on_day_start();
            tracker.register_results(&[
                result(QuestOutcome::Success),
                result(QuestOutcome::Success),
                result(QuestOutcome::Success),
                result(QuestOutcome::Fail),
            ]);
            assert_eq!(tracker.try_trigger_or_advance(), None);
        }
        assert_eq!(tracker.state(), &frozen);
        assert_eq!(tracker.daily_delta(), WorldDelta::default());
    }

    #[test]
    fn load_reconciles_terminal_phase_and_bad_counters() {
        let tracker = CrisisTracker::load(CrisisState {
            event_id: "  ".to_string(),
            phase: CrisisPhase::Resolved,
            days_in_phase: -4,
            failure_window: -1,
            finished: false,
        });
        assert!(tracker.is_finished());
        assert_eq!(tracker.state().event_id, DEFAULT_CRISIS_EVENT_ID);
        assert_eq!(tracker.state().days_in_phase, 0);
        assert_eq!(tracker.state().failure_window, 0);
    }

    #[test]
    fn daily_delta_tracks_phase_severity() {
        assert_eq!(tracker_in(CrisisPhase::Dormant, 0).daily_delta(), WorldDelta::default());
        assert_eq!(tracker_in(CrisisPhase::Active, 0).daily_delta().stability, -1);
        let escalating = tracker_in(CrisisPhase::Escalating, 0).daily_delta();
        assert_eq!((escalating.stability, escalating.casualties), (-2, 1));
        let critical = tracker_in(CrisisPhase::Critical, 0).daily_delta();
        assert_eq!(
            (critical.stability, critical.casualties, critical.reputation),
            (-3, 2, -2)
        );
    }
}
