//! Success-chance model, reason selection, and outcome deltas for one quest.

use contracts::{QuestDraft, QuestOutcome, ReasonTag, WorldDelta, NEUTRAL_CREDIBILITY};

use crate::rng::RandomSource;

pub const MIN_SUCCESS_CHANCE: i32 = 5;
pub const MAX_SUCCESS_CHANCE: i32 = 95;
const BASE_SUCCESS_CHANCE: i32 = 70;
const RISK_PENALTY_PER_LEVEL: i32 = 15;
const CREDIBILITY_WEIGHT: f32 = 0.6;
const TOP_REASON_COUNT: usize = 3;

const FILLER_REASONS: [ReasonTag; 3] = [
    ReasonTag::FieldVariables,
    ReasonTag::InformationShortage,
    ReasonTag::OperationalConstraints,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: QuestOutcome,
    pub final_chance: i32,
}

/// `clamp(70 - (risk-1)*15 + (avg-50)*0.6, 5, 95)`, rounded half-to-even.
pub fn success_chance(risk: i32, avg_credibility: i32) -> i32 {
    let base = BASE_SUCCESS_CHANCE - (risk - 1) * RISK_PENALTY_PER_LEVEL;
    let bonus = (avg_credibility - NEUTRAL_CREDIBILITY) as f32 * CREDIBILITY_WEIGHT;
    let raw = base as f32 + bonus;
    if raw < MIN_SUCCESS_CHANCE as f32 {
        MIN_SUCCESS_CHANCE
    } else if raw > MAX_SUCCESS_CHANCE as f32 {
        MAX_SUCCESS_CHANCE
    } else {
        raw.round_ties_even() as i32
    }
}

/// Consumes exactly one unit-float draw.
pub fn resolve<R>(draft: &QuestDraft, avg_credibility: i32, rng: &mut R) -> Resolution
where
    R: RandomSource + ?Sized,
{
    let final_chance = success_chance(draft.risk, avg_credibility);
    let roll = rng.unit_float() * 100.0;
    let outcome = if roll < final_chance as f32 {
        QuestOutcome::Success
    } else {
        QuestOutcome::Fail
    };
    Resolution {
        outcome,
        final_chance,
    }
}

/// Mean credibility of the non-blank sources; unknown ids count as neutral and
/// a draft without usable sources is neutral outright.
pub fn average_credibility<F>(source_info_ids: &[String], lookup: F) -> i32
where
    F: Fn(&str) -> Option<i32>,
{
    let (sum, count) = source_info_ids
        .iter()
        .filter(|id| !id.trim().is_empty())
        .fold((0_i64, 0_i64), |(sum, count), id| {
            let credibility = lookup(id).unwrap_or(NEUTRAL_CREDIBILITY);
            (sum + i64::from(credibility), count + 1)
        });
    if count == 0 {
        return NEUTRAL_CREDIBILITY;
    }
    (sum as f32 / count as f32).round_ties_even() as i32
}

pub fn top_reasons(draft: &QuestDraft, avg_credibility: i32) -> Vec<ReasonTag> {
    let mut reasons = Vec::with_capacity(TOP_REASON_COUNT + FILLER_REASONS.len());
    if draft.risk >= 4 {
        push_unique(&mut reasons, ReasonTag::HighRisk);
    }
    if avg_credibility < 40 {
        push_unique(&mut reasons, ReasonTag::LowCredibility);
    }
    if avg_credibility >= 70 {
        push_unique(&mut reasons, ReasonTag::HighCredibility);
    }
    if draft.deadline_days <= 2 {
        push_unique(&mut reasons, ReasonTag::TightDeadline);
    }
    for filler in FILLER_REASONS {
        push_unique(&mut reasons, filler);
    }
    reasons.truncate(TOP_REASON_COUNT);
    reasons
}

pub fn world_delta(draft: &QuestDraft, outcome: QuestOutcome) -> WorldDelta {
    match outcome {
        QuestOutcome::Success => WorldDelta {
            reputation: 5 + draft.risk * 2,
            stability: 2,
            budget: draft.reward,
            influence: 1,
            casualties: 0,
        },
        QuestOutcome::Fail => WorldDelta {
            reputation: -(4 + draft.risk * 2),
            stability: -3,
            budget: 0,
            influence: 0,
            casualties: i32::from(draft.risk >= 4),
        },
    }
}

fn push_unique(reasons: &mut Vec<ReasonTag>, reason: ReasonTag) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}
