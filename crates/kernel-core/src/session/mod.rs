//! The single-owner game session: day counter, master seed, every ledger, and
//! the phase machine that sequences them.

mod commands;
mod flow;
mod snapshot;

use std::time::{SystemTime, UNIX_EPOCH};

use contracts::{
    CrisisState, DayPhase, InfoItem, QuestDraft, QuestResult, QuestSubmission, SessionConfig,
    SessionStatus, WorldState, SCHEMA_VERSION_V1,
};
use tracing::info;

use crate::action_points::ActionPoints;
use crate::crisis::CrisisTracker;
use crate::day::{DayCycle, SubscriptionId};
use crate::info::InfoBoard;
use crate::ledger::WorldLedger;
use crate::quest::QuestLedger;
use crate::rng::RandomStream;

const DAY_SEED_SALT: u32 = 0x9e37_79b9;

/// Per-day stream seed. Bit-exact with existing saves, so every step wraps.
pub fn seed_for_day(seed: i32, day: i32) -> i32 {
    let mut value = seed;
    value ^= day
        .wrapping_add(DAY_SEED_SALT as i32)
        .wrapping_add(value.wrapping_shl(6))
        .wrapping_add(value >> 2);
    value ^= value.wrapping_shl(13);
    value ^= value >> 17;
    value ^= value.wrapping_shl(5);
    value
}

fn wall_clock_seed() -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or_default();
    (nanos ^ (nanos >> 32)) as i32
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    seed: i32,
    current_day: i32,
    world: WorldLedger,
    crisis: CrisisTracker,
    action_points: ActionPoints,
    infos: InfoBoard,
    quests: QuestLedger,
    day_cycle: DayCycle,
    /// Shared by the day's info batch and its resolution rolls, in that order.
    day_stream: RandomStream,
    crisis_advanced_today: bool,
    last_results: Vec<QuestResult>,
}

impl Session {
    fn blank(config: SessionConfig, seed: i32) -> Self {
        Self {
            seed,
            current_day: 1,
            world: WorldLedger::new(config.starting_world),
            crisis: CrisisTracker::new(),
            action_points: ActionPoints::new(config.max_action_points),
            infos: InfoBoard::new(config.info_batch_size),
            quests: QuestLedger::new(config.max_submissions_per_day),
            day_cycle: DayCycle::new(),
            day_stream: RandomStream::new(seed_for_day(seed, 1)),
            crisis_advanced_today: false,
            last_results: Vec::new(),
            config,
        }
    }

    /// Starts day 1 and runs its DayStart, leaving the session in InfoPhase.
    /// Without a seed one is taken from the wall clock.
    pub fn new_game(config: SessionConfig, seed: Option<i32>) -> Self {
        let seed = seed.unwrap_or_else(wall_clock_seed);
        let mut session = Self::blank(config, seed);
        session.restart(Some(seed));
        session
    }

    /// Throws away all progress and begins again on day 1. Observers stay
    /// subscribed and see the forced DayStart.
    pub fn restart(&mut self, seed: Option<i32>) {
        self.seed = seed.unwrap_or_else(wall_clock_seed);
        self.current_day = 1;
        self.world.reset(self.config.starting_world);
        self.crisis = CrisisTracker::new();
        self.infos.clear();
        self.quests.reset();
        self.last_results.clear();
        self.crisis_advanced_today = false;
        info!(seed = self.seed, "new game started");
        self.force_set(DayPhase::DayStart);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn current_day(&self) -> i32 {
        self.current_day
    }

    pub fn phase(&self) -> DayPhase {
        self.day_cycle.current()
    }

    pub fn world(&self) -> &WorldState {
        self.world.state()
    }

    pub fn crisis(&self) -> &CrisisState {
        self.crisis.state()
    }

    pub fn action_points(&self) -> &ActionPoints {
        &self.action_points
    }

    pub fn infos(&self) -> &[InfoItem] {
        self.infos.infos()
    }

    pub fn drafts(&self) -> &[QuestDraft] {
        self.quests.drafts()
    }

    pub fn submissions(&self) -> &[QuestSubmission] {
        self.quests.submissions()
    }

    /// Results of the most recent resolution; replaced, never appended.
    pub fn last_results(&self) -> &[QuestResult] {
        &self.last_results
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            current_day: self.current_day,
            seed: self.seed,
            day_phase: self.phase(),
            action_points: self.action_points.current(),
            world: *self.world.state(),
            crisis: self.crisis.state().clone(),
            draft_count: self.quests.drafts().len(),
            submitted_today: self.quests.submissions().len(),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(DayPhase) + Send + 'static,
    {
        self.day_cycle.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.day_cycle.unsubscribe(id)
    }
}
