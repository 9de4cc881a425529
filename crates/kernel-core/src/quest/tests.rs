use std::collections::VecDeque;

use contracts::{QuestOutcome, ReasonTag, WorldDelta};

use super::resolver::{self, success_chance};
use super::*;
use crate::error::PreconditionViolation;
use crate::rng::RandomStream;

/// Replays fixed unit floats; integer draws are not used by resolution.
struct ScriptedRolls(VecDeque<f32>);

impl ScriptedRolls {
    fn new(rolls: &[f32]) -> Self {
        Self(rolls.iter().copied().collect())
    }
}

impl RandomSource for ScriptedRolls {
    fn range_int(&mut self, min: i32, _max: i32) -> Result<i32, PreconditionViolation> {
        Ok(min)
    }

    fn unit_float(&mut self) -> f32 {
        self.0.pop_front().expect("scripted roll available")
    }
}

fn ledger_with_drafts(count: usize) -> (QuestLedger, Vec<String>) {
    let mut ledger = QuestLedger::default();
    let ids = (0..count)
        .map(|_| {
            ledger
                .create_draft(QuestTemplate::Escort, ["info:a"], 2, 100, 3)
                .id
                .clone()
        })
        .collect();
    (ledger, ids)
}

#[test]
fn create_draft_clamps_and_dedupes() {
    let mut ledger = QuestLedger::default();
    let draft = ledger
        .create_draft(QuestTemplate::Combat, ["a", "b", "a", " ", "b"], 7, -10, 0)
        .clone();
    assert_eq!(draft.id, "Q0001");
    assert_eq!(draft.risk, 5);
    assert_eq!(draft.deadline_days, 1);
    assert_eq!(draft.reward, 1);
    assert_eq!(draft.source_info_ids, vec!["a".to_string(), "b".to_string()]);

    let low = ledger
        .create_draft(QuestTemplate::Diplomacy, Vec::<String>::new(), -3, 50, 9)
        .clone();
    assert_eq!(low.id, "Q0002");
    assert_eq!(low.risk, 1);
    assert_eq!(low.deadline_days, 5);
}

#[test]
fn draft_sequence_survives_clear_and_reset() {
    let (mut ledger, _) = ledger_with_drafts(2);
    ledger.clear_drafts();
    ledger.reset();
    let next = ledger
        .create_draft(QuestTemplate::Delivery, ["x"], 1, 10, 1)
        .id
        .clone();
    assert_eq!(next, "Q0003");
}

#[test]
fn fifth_submission_in_a_day_fails() {
    let (mut ledger, ids) = ledger_with_drafts(5);
    for id in &ids[..4] {
        assert!(ledger.try_submit(id, 1));
    }
    assert!(!ledger.try_submit(&ids[4], 1));
    assert_eq!(ledger.submissions().len(), 4);
}

#[test]
fn duplicate_and_unknown_submissions_fail() {
    let (mut ledger, ids) = ledger_with_drafts(1);
    assert!(ledger.try_submit(&ids[0], 1));
    assert!(!ledger.try_submit(&ids[0], 1));
    assert!(!ledger.try_submit("Q9999", 1));
    assert!(!ledger.try_submit("", 1));
    assert!(!ledger.try_submit(&ids[0], 0));
    assert_eq!(ledger.submissions().len(), 1);
}

#[test]
fn bucket_resets_when_the_day_changes() {
    let (mut ledger, ids) = ledger_with_drafts(4);
    for id in &ids {
        assert!(ledger.try_submit(id, 1));
    }
    assert!(ledger.try_submit(&ids[0], 2));
    assert_eq!(ledger.submissions().len(), 1);
    assert_eq!(ledger.submissions()[0].submitted_day, 2);
}

#[test]
fn chance_matches_reference_points_and_stays_clamped() {
    assert_eq!(success_chance(1, 50), 70);
    assert_eq!(success_chance(5, 90), 34);
    assert_eq!(success_chance(1, 100), 95);
    assert_eq!(success_chance(5, 0), 5);
    for risk in 1..=5 {
        for credibility in 0..=100 {
            let chance = success_chance(risk, credibility);
            assert!((5..=95).contains(&chance), "risk={risk} cred={credibility}");
        }
    }
}

#[test]
fn average_credibility_uses_neutral_fallbacks() {
    let lookup = |id: &str| match id {
        "a" => Some(80),
        "b" => Some(41),
        _ => None,
    };
    assert_eq!(resolver::average_credibility(&Vec::<String>::new(), lookup), 50);
    assert_eq!(resolver::average_credibility(&[" ".to_string()], lookup), 50);
    assert_eq!(
        resolver::average_credibility(&["a".to_string(), "missing".to_string()], lookup),
        65
    );
    // 121 / 2 = 60.5 rounds to even.
    assert_eq!(
        resolver::average_credibility(&["a".to_string(), "b".to_string()], lookup),
        60
    );
}

#[test]
fn reasons_follow_priority_then_fillers() {
    let mut ledger = QuestLedger::default();
    let risky = ledger
        .create_draft(QuestTemplate::Combat, ["a"], 4, 100, 2)
        .clone();
    assert_eq!(
        resolver::top_reasons(&risky, 30),
        vec![ReasonTag::HighRisk, ReasonTag::LowCredibility, ReasonTag::TightDeadline]
    );
    assert_eq!(
        resolver::top_reasons(&risky, 75),
        vec![ReasonTag::HighRisk, ReasonTag::HighCredibility, ReasonTag::TightDeadline]
    );

    let calm = ledger
        .create_draft(QuestTemplate::Delivery, ["a"], 2, 100, 4)
        .clone();
    assert_eq!(
        resolver::top_reasons(&calm, 50),
        vec![
            ReasonTag::FieldVariables,
            ReasonTag::InformationShortage,
            ReasonTag::OperationalConstraints
        ]
    );
    assert_eq!(
        resolver::top_reasons(&calm, 90),
        vec![
            ReasonTag::HighCredibility,
            ReasonTag::FieldVariables,
            ReasonTag::InformationShortage
        ]
    );
}

#[test]
fn outcome_deltas_scale_with_risk() {
    let mut ledger = QuestLedger::default();
    let draft = ledger
        .create_draft(QuestTemplate::Purification, ["a"], 4, 250, 3)
        .clone();
    assert_eq!(
        resolver::world_delta(&draft, QuestOutcome::Success),
        WorldDelta {
            reputation: 13,
            stability: 2,
            budget: 250,
            influence: 1,
            casualties: 0,
        }
    );
    assert_eq!(
        resolver::world_delta(&draft, QuestOutcome::Fail),
        WorldDelta {
            reputation: -12,
            stability: -3,
            budget: 0,
            influence: 0,
            casualties: 1,
        }
    );
}

#[test]
fn resolution_rolls_once_per_submission_and_clears_bucket() {
    let (mut ledger, ids) = ledger_with_drafts(3);
    for id in &ids {
        assert!(ledger.try_submit(id, 1));
    }
    // Chance for risk 2 with neutral credibility is 55.
    let mut rolls = ScriptedRolls::new(&[0.10, 0.55, 0.99]);
    let results = ledger.resolve_submitted(1, &mut rolls, |_| None);

    let outcomes = results.iter().map(|r| r.outcome).collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![QuestOutcome::Success, QuestOutcome::Fail, QuestOutcome::Fail]
    );
    assert!(results.iter().all(|r| r.final_success_chance == 55));
    assert_eq!(results[0].quest_id, ids[0]);
    assert!(ledger.submissions().is_empty());
    assert!(rolls.0.is_empty());
}

#[test]
fn resolution_skips_other_days_but_still_clears() {
    let (mut ledger, ids) = ledger_with_drafts(2);
    assert!(ledger.try_submit(&ids[0], 3));
    let mut stream = RandomStream::new(5);
    let results = ledger.resolve_submitted(4, &mut stream, |_| None);
    assert!(results.is_empty());
    assert!(ledger.submissions().is_empty());
    assert_eq!(stream.draws(), 0);
    // Bucket state was forgotten, so the same draft can go in again.
    assert!(ledger.try_submit(&ids[0], 3));
}
