use contracts::QuestTemplate;
use tracing::debug;

use super::*;

impl Session {
    pub fn investigate(&mut self, info_id: &str) -> bool {
        self.phase() == DayPhase::InfoPhase && self.infos.investigate(info_id)
    }

    pub fn archive(&mut self, info_id: &str) -> bool {
        self.phase() == DayPhase::InfoPhase && self.infos.archive(info_id)
    }

    pub fn discard(&mut self, info_id: &str) -> bool {
        self.phase() == DayPhase::InfoPhase && self.infos.discard(info_id)
    }

    /// Drafts a quest from today's infos and marks them used. Every source must
    /// be a live info not yet used by another draft; otherwise nothing changes.
    pub fn create_draft<I, S>(
        &mut self,
        template: QuestTemplate,
        source_info_ids: I,
        risk: i32,
        reward: i32,
        deadline_days: i32,
    ) -> Option<QuestDraft>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.phase() != DayPhase::QuestDraftPhase {
            return None;
        }

        let mut sources = Vec::<String>::new();
        for id in source_info_ids {
            let id = id.as_ref();
            if !id.trim().is_empty() && !sources.iter().any(|existing| existing == id) {
                sources.push(id.to_string());
            }
        }
        if sources.is_empty() {
            return None;
        }
        let all_available = sources.iter().all(|id| {
            self.infos
                .get(id)
                .is_some_and(|info| !info.is_locked() && !info.used_in_draft)
        });
        if !all_available {
            debug!(?sources, "draft rejected, a source info is unavailable");
            return None;
        }

        for id in &sources {
            self.infos.mark_used(id);
        }
        let draft = self
            .quests
            .create_draft(template, &sources, risk, reward, deadline_days)
            .clone();
        debug!(draft_id = %draft.id, risk = draft.risk, "draft created");
        Some(draft)
    }

    /// Submits a draft for the current day.
    pub fn try_submit(&mut self, draft_id: &str) -> bool {
        self.phase() == DayPhase::SubmissionPhase
            && self.quests.try_submit(draft_id, self.current_day)
    }

    pub fn spend_action_points(&mut self, amount: i32) -> bool {
        self.action_points.try_consume(amount)
    }
}
