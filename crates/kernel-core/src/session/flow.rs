use tracing::{debug, error, info};

use super::*;
use crate::day::successor;

impl Session {
    /// Validated step to `next`. Runs the phase's entry work only when the
    /// transition is accepted.
    pub fn try_advance(&mut self, next: DayPhase) -> bool {
        if !self.day_cycle.try_advance(next) {
            return false;
        }
        self.enter_phase(next);
        true
    }

    /// Steps to whatever phase follows the current one.
    pub fn advance(&mut self) -> bool {
        self.try_advance(successor(self.phase()))
    }

    /// Replay/tooling jump. Always notifies and always re-runs the entry work,
    /// even when `phase` is already current.
    pub fn force_set(&mut self, phase: DayPhase) {
        self.day_cycle.force_set(phase);
        self.enter_phase(phase);
    }

    pub(super) fn enter_phase(&mut self, phase: DayPhase) {
        debug!(day = self.current_day, phase = %phase, "entering phase");
        match phase {
            DayPhase::DayStart => self.start_day(),
            DayPhase::InfoPhase | DayPhase::QuestDraftPhase | DayPhase::SubmissionPhase => {}
            DayPhase::ResolutionPhase => self.resolve_day(),
            DayPhase::DayEnd => self.end_day(),
        }
    }

    fn start_day(&mut self) {
        self.crisis.on_day_start();
        self.advance_crisis_once_per_day();
        let pressure = self.crisis.daily_delta();
        self.world.apply_delta(&pressure);
        self.action_points.start_day();
        self.generate_infos();

        debug!(
            day = self.current_day,
            infos = self.infos.infos().len(),
            action_points = self.action_points.current(),
            "day started"
        );
        if self.day_cycle.try_advance(DayPhase::InfoPhase) {
            self.enter_phase(DayPhase::InfoPhase);
        }
    }

    /// Reseeds the day stream and draws today's batch from it.
    pub(super) fn generate_infos(&mut self) {
        self.day_stream = RandomStream::new(seed_for_day(self.seed, self.current_day));
        if let Err(err) = self.infos.start_day(&mut self.day_stream, self.current_day) {
            error!(day = self.current_day, error = %err, "info batch generation failed");
            self.infos.clear();
        }
    }

    fn resolve_day(&mut self) {
        let infos = &self.infos;
        let results = self.quests.resolve_submitted(
            self.current_day,
            &mut self.day_stream,
            |info_id| infos.credibility_of(info_id),
        );
        for result in &results {
            self.world.apply_delta(&result.delta);
        }
        self.quests.clear_drafts();
        self.crisis.register_results(&results);
        self.advance_crisis_once_per_day();

        let world = self.world.state();
        debug!(
            day = self.current_day,
            resolved = results.len(),
            reputation = world.reputation,
            stability = world.stability,
            budget = world.budget,
            "resolution finished"
        );
        self.last_results = results;
    }

    fn end_day(&mut self) {
        let finished_day = self.current_day;
        self.crisis_advanced_today = false;
        self.current_day = self.current_day.saturating_add(1);
        info!(from = finished_day, to = self.current_day, "day ended");
    }

    fn advance_crisis_once_per_day(&mut self) {
        if self.crisis_advanced_today {
            debug!(day = self.current_day, "crisis advance already ran today, skipping");
            return;
        }
        self.crisis.try_trigger_or_advance();
        self.crisis_advanced_today = true;
    }
}
