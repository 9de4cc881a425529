use contracts::SessionSnapshot;
use tracing::info;

use super::*;

impl Session {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            current_day: self.current_day,
            seed: self.seed,
            action_points: Some(self.action_points.current()),
            world: *self.world.state(),
            day_phase: self.phase(),
            crisis: self.crisis.state().clone(),
        }
    }

    /// Rebuilds a session from a save. The phase is restored silently; a save
    /// taken at DayStart re-runs that day's start, and a mid-day save redraws
    /// the day's infos from the same stream without repeating start-of-day
    /// effects. Drafts and submissions are not part of a save.
    pub fn from_snapshot(config: SessionConfig, snapshot: SessionSnapshot) -> Self {
        let mut session = Self::blank(config, snapshot.seed);
        session.current_day = snapshot.current_day.max(1);
        session.world.reset(snapshot.world);
        session.crisis = CrisisTracker::load(snapshot.crisis);
        match snapshot.action_points {
            Some(points) => session.action_points.set_current(points),
            None => session.action_points.start_day(),
        }

        session.day_cycle.restore(snapshot.day_phase);
        match snapshot.day_phase {
            DayPhase::DayStart => session.enter_phase(DayPhase::DayStart),
            DayPhase::DayEnd => session.crisis_advanced_today = false,
            DayPhase::InfoPhase
            | DayPhase::QuestDraftPhase
            | DayPhase::SubmissionPhase
            | DayPhase::ResolutionPhase => {
                session.crisis_advanced_today = true;
                session.generate_infos();
            }
        }

        info!(
            day = session.current_day,
            seed = session.seed,
            phase = %session.phase(),
            "session restored from snapshot"
        );
        session
    }
}
