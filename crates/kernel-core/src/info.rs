use contracts::{InfoCategory, InfoItem};

use crate::error::PreconditionViolation;
use crate::rng::RandomSource;

pub const DEFAULT_BATCH_SIZE: usize = 6;
pub const INVESTIGATE_CREDIBILITY_GAIN: i32 = 15;
pub const MAX_CREDIBILITY: i32 = 100;
const CREDIBILITY_MIN: i32 = 20;
const CREDIBILITY_MAX_EXCLUSIVE: i32 = 86;
const ID_TOKEN_MIN: i32 = 1000;
const ID_TOKEN_MAX_EXCLUSIVE: i32 = 9999;

const REGIONS: [&str; 6] = [
    "North Gate District",
    "Merchant Row",
    "Old Harbor",
    "Outer Walls",
    "Western Farmlands",
    "Arcane Research Quarter",
];

const SUMMARY_TEMPLATES: [&str; 4] = [
    "Sightings keep piling up and need confirming.",
    "Residents are uneasy and expect a quick response.",
    "Small clues are accumulating and warrant a closer look.",
    "The guild's standing may ride on this one, so judge it carefully.",
];

/// Today's batch of leads. Replaced wholesale at each day start.
#[derive(Debug, Clone)]
pub struct InfoBoard {
    batch_size: usize,
    infos: Vec<InfoItem>,
}

impl InfoBoard {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            infos: Vec::new(),
        }
    }

    /// Draws a fresh batch for `day_index`. Per item the draw order is region,
    /// category, credibility, summary template, id token.
    pub fn start_day<R>(&mut self, rng: &mut R, day_index: i32) -> Result<(), PreconditionViolation>
    where
        R: RandomSource + ?Sized,
    {
        if day_index <= 0 {
            return Err(PreconditionViolation::InvalidDayIndex(day_index));
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        for slot in 0..self.batch_size {
            let region = REGIONS[rng.range_int(0, REGIONS.len() as i32)? as usize];
            let category = InfoCategory::ALL[rng.range_int(0, InfoCategory::ALL.len() as i32)? as usize];
            let credibility = rng.range_int(CREDIBILITY_MIN, CREDIBILITY_MAX_EXCLUSIVE)?;
            let template =
                SUMMARY_TEMPLATES[rng.range_int(0, SUMMARY_TEMPLATES.len() as i32)? as usize];
            let token = rng.range_int(ID_TOKEN_MIN, ID_TOKEN_MAX_EXCLUSIVE)?;

            let subject = category.subject();
            batch.push(InfoItem {
                id: format!("D{day_index}_I{}_{token}", slot + 1),
                title: format!("Rumors of {subject} in {region}"),
                region: region.to_string(),
                category,
                credibility,
                summary: format!("A report about {subject} came in from {region}. {template}"),
                archived: false,
                discarded: false,
                used_in_draft: false,
            });
        }

        self.infos = batch;
        Ok(())
    }

    pub fn infos(&self) -> &[InfoItem] {
        &self.infos
    }

    pub fn get(&self, info_id: &str) -> Option<&InfoItem> {
        self.infos.iter().find(|info| info.id == info_id)
    }

    pub fn credibility_of(&self, info_id: &str) -> Option<i32> {
        self.get(info_id).map(|info| info.credibility)
    }

    pub fn investigate(&mut self, info_id: &str) -> bool {
        let Some(info) = self.find_mutable(info_id) else {
            return false;
        };
        info.credibility = (info.credibility + INVESTIGATE_CREDIBILITY_GAIN).min(MAX_CREDIBILITY);
        true
    }

    pub fn archive(&mut self, info_id: &str) -> bool {
        let Some(info) = self.find_mutable(info_id) else {
            return false;
        };
        info.archived = true;
        true
    }

    pub fn discard(&mut self, info_id: &str) -> bool {
        let Some(info) = self.find_mutable(info_id) else {
            return false;
        };
        info.discarded = true;
        true
    }

    pub fn mark_used(&mut self, info_id: &str) -> bool {
        let Some(info) = self.find_mutable(info_id) else {
            return false;
        };
        info.used_in_draft = true;
        true
    }

    pub fn clear(&mut self) {
        self.infos.clear();
    }

    fn find_mutable(&mut self, info_id: &str) -> Option<&mut InfoItem> {
        if info_id.trim().is_empty() {
            return None;
        }
        self.infos
            .iter_mut()
            .find(|info| info.id == info_id)
            .filter(|info| !info.is_locked())
    }
}

impl Default for InfoBoard {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomStream;

    fn board_for(seed: i32, day: i32) -> InfoBoard {
        let mut board = InfoBoard::default();
        board
            .start_day(&mut RandomStream::new(seed), day)
            .expect("valid day");
        board
    }

    #[test]
    fn batch_has_six_items_in_credibility_band() {
        let board = board_for(12345, 1);
        assert_eq!(board.infos().len(), 6);
        for (idx, info) in board.infos().iter().enumerate() {
            assert!((20..86).contains(&info.credibility), "{info:?}");
            assert!(info.id.starts_with(&format!("D1_I{}_", idx + 1)));
            assert!(REGIONS.contains(&info.region.as_str()));
            assert!(!info.archived && !info.discarded && !info.used_in_draft);
        }
    }

    #[test]
    fn batch_consumes_five_draws_per_item() {
        let mut stream = RandomStream::new(7);
        let mut board = InfoBoard::default();
        board.start_day(&mut stream, 3).expect("valid day");
        assert_eq!(stream.draws(), 30);
    }

    #[test]
    fn same_seed_and_day_reproduce_the_batch() {
        assert_eq!(board_for(2026, 4).infos(), board_for(2026, 4).infos());
        assert_ne!(board_for(2026, 4).infos(), board_for(2027, 4).infos());
    }

    #[test]
    fn non_positive_day_is_a_precondition_violation() {
        let mut board = board_for(1, 1);
        let before = board.infos().to_vec();
        let mut stream = RandomStream::new(1);
        assert_eq!(
            board.start_day(&mut stream, 0),
            Err(PreconditionViolation::InvalidDayIndex(0))
        );
        assert_eq!(board.infos(), before.as_slice());
        assert_eq!(stream.draws(), 0);
    }

    #[test]
    fn investigate_caps_at_one_hundred() {
        let mut board = board_for(55, 2);
        let id = board.infos()[0].id.clone();
        let mut previous = board.credibility_of(&id).expect("known id");
        for _ in 0..10 {
            assert!(board.investigate(&id));
            let current = board.credibility_of(&id).expect("known id");
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, MAX_CREDIBILITY);
    }

    #[test]
    fn archived_and_discarded_items_are_frozen() {
        let mut board = board_for(55, 2);
        let archived = board.infos()[0].id.clone();
        let discarded = board.infos()[1].id.clone();

        assert!(board.archive(&archived));
        assert!(board.discard(&discarded));
        for id in [&archived, &discarded] {
            let before = board.get(id).cloned();
            assert!(!board.investigate(id));
            assert!(!board.archive(id));
            assert!(!board.discard(id));
            assert!(!board.mark_used(id));
            assert_eq!(board.get(id).cloned(), before);
        }
    }

    #[test]
    fn unknown_or_blank_ids_fail() {
        let mut board = board_for(55, 2);
        assert!(!board.investigate("D9_I9_0000"));
        assert!(!board.archive(""));
        assert!(!board.discard("   "));
        assert_eq!(board.credibility_of("missing"), None);
    }
}
