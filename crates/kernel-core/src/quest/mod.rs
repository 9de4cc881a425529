//! Quest drafts, the capped daily submission bucket, and batch resolution.

pub mod resolver;

use contracts::{QuestDraft, QuestResult, QuestSubmission, QuestTemplate};

use crate::rng::RandomSource;

pub const DEFAULT_MAX_SUBMISSIONS_PER_DAY: usize = 4;
pub const MIN_RISK: i32 = 1;
pub const MAX_RISK: i32 = 5;
pub const MIN_DEADLINE_DAYS: i32 = 1;
pub const MAX_DEADLINE_DAYS: i32 = 5;
pub const MIN_REWARD: i32 = 1;

#[derive(Debug, Clone)]
pub struct QuestLedger {
    drafts: Vec<QuestDraft>,
    submissions: Vec<QuestSubmission>,
    draft_sequence: u32,
    submission_day: Option<i32>,
    max_submissions_per_day: usize,
}

impl QuestLedger {
    pub fn new(max_submissions_per_day: usize) -> Self {
        Self {
            drafts: Vec::new(),
            submissions: Vec::new(),
            draft_sequence: 0,
            submission_day: None,
            max_submissions_per_day,
        }
    }

    pub fn drafts(&self) -> &[QuestDraft] {
        &self.drafts
    }

    pub fn submissions(&self) -> &[QuestSubmission] {
        &self.submissions
    }

    pub fn max_submissions_per_day(&self) -> usize {
        self.max_submissions_per_day
    }

    pub fn draft(&self, draft_id: &str) -> Option<&QuestDraft> {
        self.drafts.iter().find(|draft| draft.id == draft_id)
    }

    /// Records a new draft with risk and deadline clamped to `[1, 5]`, reward
    /// floored at 1, and blank or repeated source ids dropped.
    pub fn create_draft<I, S>(
        &mut self,
        template: QuestTemplate,
        source_info_ids: I,
        risk: i32,
        reward: i32,
        deadline_days: i32,
    ) -> &QuestDraft
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sources = Vec::<String>::new();
        for id in source_info_ids {
            let id = id.as_ref();
            if id.trim().is_empty() || sources.iter().any(|existing| existing == id) {
                continue;
            }
            sources.push(id.to_string());
        }

        self.draft_sequence = self.draft_sequence.saturating_add(1);
        let index = self.drafts.len();
        self.drafts.push(QuestDraft {
            id: format!("Q{:04}", self.draft_sequence),
            template,
            source_info_ids: sources,
            risk: risk.clamp(MIN_RISK, MAX_RISK),
            reward: reward.max(MIN_REWARD),
            deadline_days: deadline_days.clamp(MIN_DEADLINE_DAYS, MAX_DEADLINE_DAYS),
        });
        &self.drafts[index]
    }

    /// Commits a draft for `day`. Fails on a blank id, a non-positive day, a
    /// full bucket, an unknown draft, or a draft already submitted that day.
    pub fn try_submit(&mut self, draft_id: &str, day: i32) -> bool {
        if draft_id.trim().is_empty() || day <= 0 {
            return false;
        }

        if self.submission_day != Some(day) {
            self.submissions.clear();
            self.submission_day = Some(day);
        }

        if self.submissions.len() >= self.max_submissions_per_day {
            return false;
        }

        let Some(draft) = self.draft(draft_id).cloned() else {
            return false;
        };

        if self
            .submissions
            .iter()
            .any(|submission| submission.draft.id == draft_id)
        {
            return false;
        }

        self.submissions.push(QuestSubmission {
            draft,
            submitted_day: day,
        });
        true
    }

    /// Resolves every submission made on `day` in submission order, one roll
    /// each, then empties the whole bucket.
    pub fn resolve_submitted<R, F>(&mut self, day: i32, rng: &mut R, credibility: F) -> Vec<QuestResult>
    where
        R: RandomSource + ?Sized,
        F: Fn(&str) -> Option<i32>,
    {
        let mut results = Vec::new();
        for submission in &self.submissions {
            if submission.submitted_day != day {
                continue;
            }
            let draft = &submission.draft;
            let avg_credibility = resolver::average_credibility(&draft.source_info_ids, &credibility);
            let resolution = resolver::resolve(draft, avg_credibility, rng);
            results.push(QuestResult {
                quest_id: draft.id.clone(),
                outcome: resolution.outcome,
                final_success_chance: resolution.final_chance,
                top_reasons: resolver::top_reasons(draft, avg_credibility),
                delta: resolver::world_delta(draft, resolution.outcome),
            });
        }

        self.submissions.clear();
        self.submission_day = None;
        results
    }

    pub fn clear_drafts(&mut self) {
        self.drafts.clear();
    }

    /// Drops drafts and submissions for a new game. The id sequence keeps
    /// counting so draft ids stay unique for the life of the process.
    pub fn reset(&mut self) {
        self.drafts.clear();
        self.submissions.clear();
        self.submission_day = None;
    }
}

impl Default for QuestLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBMISSIONS_PER_DAY)
    }
}

#[cfg(test)]
mod tests;
