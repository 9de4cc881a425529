//! Daily phase machine with synchronous observers.

use std::fmt;

use contracts::DayPhase;

pub const PHASE_CYCLE: [DayPhase; 6] = [
    DayPhase::DayStart,
    DayPhase::InfoPhase,
    DayPhase::QuestDraftPhase,
    DayPhase::SubmissionPhase,
    DayPhase::ResolutionPhase,
    DayPhase::DayEnd,
];

/// The single phase that may follow `phase`.
pub fn successor(phase: DayPhase) -> DayPhase {
    match phase {
        DayPhase::DayStart => DayPhase::InfoPhase,
        DayPhase::InfoPhase => DayPhase::QuestDraftPhase,
        DayPhase::QuestDraftPhase => DayPhase::SubmissionPhase,
        DayPhase::SubmissionPhase => DayPhase::ResolutionPhase,
        DayPhase::ResolutionPhase => DayPhase::DayEnd,
        DayPhase::DayEnd => DayPhase::DayStart,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type PhaseObserver = Box<dyn FnMut(DayPhase) + Send>;

pub struct DayCycle {
    current: DayPhase,
    observers: Vec<(SubscriptionId, PhaseObserver)>,
    next_subscription: u64,
}

impl DayCycle {
    pub fn new() -> Self {
        Self {
            current: DayPhase::DayStart,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn current(&self) -> DayPhase {
        self.current
    }

    pub fn can_transition(&self, next: DayPhase) -> bool {
        next == successor(self.current)
    }

    /// Validated transition. Returns false, with no notification, for anything
    /// but the current phase's successor.
    pub fn try_advance(&mut self, next: DayPhase) -> bool {
        if !self.can_transition(next) || next == self.current {
            return false;
        }
        self.current = next;
        self.notify(next);
        true
    }

    /// Debug/replay jump. Skips validation and notifies even when `state`
    /// equals the current phase.
    pub fn force_set(&mut self, state: DayPhase) {
        self.current = state;
        self.notify(state);
    }

    /// Snapshot restore: sets the phase without notifying anyone.
    pub fn restore(&mut self, state: DayPhase) {
        self.current = state;
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(DayPhase) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, phase: DayPhase) {
        for (_, observer) in &mut self.observers {
            observer(phase);
        }
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DayCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayCycle")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}
