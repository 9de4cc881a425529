//! In-process game facade with phase-gated actions and SQLite save slots.

mod persistence;
mod server;

use std::path::Path;

use contracts::{
    DayPhase, InfoItem, QuestDraft, QuestResult, QuestTemplate, SessionConfig, SessionSnapshot,
    SessionStatus,
};
use kernel_core::{Session, SubscriptionId};
pub use persistence::{PersistenceError, SaveSlotSummary, SqliteSaveStore};
pub use server::{serve, ServerError};
use tracing::{info, warn};

pub const DEFAULT_SLOT: &str = "default";

#[derive(Debug)]
struct PersistenceState {
    store: SqliteSaveStore,
    slot: String,
}

#[derive(Debug)]
pub struct GameApi {
    session: Session,
    persistence: Option<PersistenceState>,
    last_persistence_error: Option<String>,
}

impl GameApi {
    pub fn new_game(config: SessionConfig, seed: Option<i32>) -> Self {
        Self::from_session(Session::new_game(config, seed))
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            session,
            persistence: None,
            last_persistence_error: None,
        }
    }

    /// Opens the store and resumes `slot` if it holds a readable save, else
    /// starts a new game and saves it straight away.
    pub fn start_or_load(
        config: SessionConfig,
        path: impl AsRef<Path>,
        slot: &str,
        seed: Option<i32>,
    ) -> Result<Self, PersistenceError> {
        let store = SqliteSaveStore::open(path)?;
        let resumed = store.load(slot)?;
        let loaded = resumed.is_some();
        let session = match resumed {
            Some(snapshot) => Session::from_snapshot(config, snapshot),
            None => Session::new_game(config, seed),
        };

        let mut api = Self::from_session(session);
        api.persistence = Some(PersistenceState {
            store,
            slot: slot.to_string(),
        });
        if !loaded {
            api.save_checked()?;
        }
        info!(slot, loaded, day = api.session.current_day(), "game ready");
        Ok(api)
    }

    pub fn attach_sqlite_store(
        &mut self,
        path: impl AsRef<Path>,
        slot: &str,
    ) -> Result<(), PersistenceError> {
        let store = SqliteSaveStore::open(path)?;
        self.persistence = Some(PersistenceState {
            store,
            slot: slot.to_string(),
        });
        Ok(())
    }

    pub fn save_checked(&mut self) -> Result<(), PersistenceError> {
        let Some(state) = self.persistence.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };
        state.store.save(&state.slot, &self.session.snapshot())?;
        self.last_persistence_error = None;
        Ok(())
    }

    /// Deletes the attached slot's save. The running session is untouched, so
    /// the next autosave writes the slot again.
    pub fn clear_save(&mut self) -> Result<bool, PersistenceError> {
        let Some(state) = self.persistence.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };
        let removed = state.store.clear(&state.slot)?;
        info!(slot = %state.slot, removed, "save slot cleared");
        Ok(removed)
    }

    pub fn list_slots(&self) -> Result<Vec<SaveSlotSummary>, PersistenceError> {
        let Some(state) = self.persistence.as_ref() else {
            return Err(PersistenceError::NotAttached);
        };
        state.store.list_slots()
    }

    pub fn slot(&self) -> Option<&str> {
        self.persistence.as_ref().map(|state| state.slot.as_str())
    }

    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn infos(&self) -> &[InfoItem] {
        self.session.infos()
    }

    pub fn drafts(&self) -> &[QuestDraft] {
        self.session.drafts()
    }

    pub fn last_results(&self) -> &[QuestResult] {
        self.session.last_results()
    }

    /// Starts over on day 1 and saves over the attached slot.
    pub fn restart(&mut self, seed: Option<i32>) -> SessionStatus {
        self.session.restart(seed);
        self.save_if_enabled();
        self.session.status()
    }

    pub fn advance(&mut self) -> bool {
        self.with_autosave(Session::advance)
    }

    pub fn try_advance(&mut self, next: DayPhase) -> bool {
        self.with_autosave(|session| session.try_advance(next))
    }

    pub fn force_set(&mut self, phase: DayPhase) {
        self.with_autosave(|session| session.force_set(phase));
    }

    pub fn investigate(&mut self, info_id: &str) -> bool {
        self.session.investigate(info_id)
    }

    pub fn archive(&mut self, info_id: &str) -> bool {
        self.session.archive(info_id)
    }

    pub fn discard(&mut self, info_id: &str) -> bool {
        self.session.discard(info_id)
    }

    pub fn create_draft(
        &mut self,
        template: QuestTemplate,
        source_info_ids: &[String],
        risk: i32,
        reward: i32,
        deadline_days: i32,
    ) -> Option<QuestDraft> {
        self.session
            .create_draft(template, source_info_ids, risk, reward, deadline_days)
    }

    pub fn try_submit(&mut self, draft_id: &str) -> bool {
        self.session.try_submit(draft_id)
    }

    pub fn spend_action_points(&mut self, amount: i32) -> bool {
        self.session.spend_action_points(amount)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(DayPhase) + Send + 'static,
    {
        self.session.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.session.unsubscribe(id)
    }

    /// Runs a phase change and saves when it rolled the day over.
    fn with_autosave<T>(&mut self, change: impl FnOnce(&mut Session) -> T) -> T {
        let day_before = self.session.current_day();
        let outcome = change(&mut self.session);
        if self.session.current_day() != day_before {
            self.save_if_enabled();
        }
        outcome
    }

    fn save_if_enabled(&mut self) {
        if self.persistence.is_none() {
            return;
        }

        if let Err(err) = self.save_checked() {
            warn!(error = %err, "autosave failed");
            self.last_persistence_error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use contracts::CrisisPhase;

    use super::*;

    fn temp_db_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();

        std::env::temp_dir().join(format!("questboard_api_{name}_{nanos}.sqlite"))
    }

    fn cleanup(path: &std::path::Path) {
        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(path.with_extension("sqlite-wal"));
        let _ = std::fs::remove_file(path.with_extension("sqlite-shm"));
    }

    fn finish_day(api: &mut GameApi) {
        while api.status().day_phase != DayPhase::DayEnd {
            assert!(api.advance());
        }
    }

    #[test]
    fn save_without_store_reports_not_attached() {
        let mut api = GameApi::new_game(SessionConfig::default(), Some(1));
        assert!(matches!(api.save_checked(), Err(PersistenceError::NotAttached)));
        assert!(api.slot().is_none());
        assert!(api.advance());
        assert!(api.last_persistence_error().is_none());
    }

    #[test]
    fn fresh_slot_starts_a_new_game_and_saves_it() {
        let path = temp_db_path("fresh");
        let api = GameApi::start_or_load(SessionConfig::default(), &path, "alpha", Some(12345))
            .expect("start");
        assert_eq!(api.status().current_day, 1);
        assert_eq!(api.status().day_phase, DayPhase::InfoPhase);

        let slots = api.list_slots().expect("list");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot, "alpha");
        assert_eq!(slots[0].seed, 12345);

        drop(api);
        cleanup(&path);
    }

    #[test]
    fn day_rollover_autosaves_and_reload_resumes() {
        let path = temp_db_path("autosave");
        let mut api = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(77))
            .expect("start");
        finish_day(&mut api);
        let saved = api.snapshot();
        assert_eq!(saved.current_day, 2);
        assert_eq!(saved.day_phase, DayPhase::DayEnd);
        drop(api);

        let mut resumed = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(1))
            .expect("reload");
        assert_eq!(resumed.snapshot(), saved);
        assert!(resumed.advance());
        assert_eq!(resumed.status().day_phase, DayPhase::InfoPhase);
        assert_eq!(resumed.status().current_day, 2);

        drop(resumed);
        cleanup(&path);
    }

    #[test]
    fn corrupt_slot_falls_back_to_a_new_game() {
        let path = temp_db_path("corrupt");
        {
            let mut store = SqliteSaveStore::open(&path).expect("open");
            let mut snapshot = GameApi::new_game(SessionConfig::default(), Some(3)).snapshot();
            snapshot.current_day = 9;
            store.save("main", &snapshot).expect("save");
            store
                .connection()
                .execute("UPDATE saves SET payload_json = 'not json' WHERE slot = 'main'", [])
                .expect("corrupt the row");
        }

        let api = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(5))
            .expect("start");
        assert_eq!(api.status().current_day, 1);
        assert_eq!(api.status().seed, 5);
        assert_eq!(api.status().crisis.phase, CrisisPhase::Dormant);

        drop(api);
        cleanup(&path);
    }

    #[test]
    fn cleared_slot_starts_over_on_next_open() {
        let path = temp_db_path("clear");
        let mut api = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(21))
            .expect("start");
        finish_day(&mut api);
        assert_eq!(api.snapshot().current_day, 2);

        assert!(api.clear_save().expect("clear"));
        assert!(!api.clear_save().expect("clear again"));
        assert!(api.list_slots().expect("list").is_empty());
        assert_eq!(api.status().current_day, 2);
        drop(api);

        let fresh = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(4))
            .expect("reopen");
        assert_eq!(fresh.status().current_day, 1);
        assert_eq!(fresh.status().seed, 4);

        drop(fresh);
        cleanup(&path);
    }

    #[test]
    fn clearing_without_store_reports_not_attached() {
        let mut api = GameApi::new_game(SessionConfig::default(), Some(1));
        assert!(matches!(api.clear_save(), Err(PersistenceError::NotAttached)));
    }

    #[test]
    fn restart_overwrites_the_slot() {
        let path = temp_db_path("restart");
        let mut api = GameApi::start_or_load(SessionConfig::default(), &path, "main", Some(8))
            .expect("start");
        finish_day(&mut api);
        api.restart(Some(9));

        let store = SqliteSaveStore::open(&path).expect("open");
        let saved = store.load("main").expect("load").expect("slot present");
        assert_eq!(saved.seed, 9);
        assert_eq!(saved.current_day, 1);

        drop(api);
        cleanup(&path);
    }
}
