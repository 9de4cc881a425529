use std::fmt;
use std::path::Path;

use contracts::SessionSnapshot;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One row of the save index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSlotSummary {
    pub slot: String,
    pub schema_version: String,
    pub current_day: i32,
    pub seed: i32,
    pub saved_at: String,
}

#[derive(Debug)]
pub enum PersistenceError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    NotAttached,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Serde(err) => write!(f, "serde error: {err}"),
            Self::NotAttached => write!(f, "sqlite save store is not attached"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

#[derive(Debug)]
pub struct SqliteSaveStore {
    conn: Connection,
}

impl SqliteSaveStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    /// Writes `snapshot` into `slot`, replacing whatever the slot held.
    pub fn save(&mut self, slot: &str, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let payload_json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO saves (
                slot,
                schema_version,
                current_day,
                seed,
                payload_json,
                saved_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(slot) DO UPDATE SET
                schema_version = excluded.schema_version,
                current_day = excluded.current_day,
                seed = excluded.seed,
                payload_json = excluded.payload_json,
                saved_at = excluded.saved_at",
            params![
                slot,
                snapshot.schema_version.as_str(),
                i64::from(snapshot.current_day),
                i64::from(snapshot.seed),
                payload_json,
                day_stamp(snapshot.current_day),
            ],
        )?;
        Ok(())
    }

    /// Reads the slot back. A missing slot is `None`; so is a row whose
    /// payload is not text or does not parse, which is logged and otherwise
    /// treated as no save at all.
    pub fn load(&self, slot: &str) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload_json FROM saves WHERE slot = ?1",
                params![slot],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Text(raw) => Some(String::from_utf8_lossy(raw).into_owned()),
                        _ => None,
                    })
                },
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        let Some(raw) = payload else {
            warn!(slot, "save payload is not text, ignoring it");
            return Ok(None);
        };

        match serde_json::from_str::<SessionSnapshot>(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                warn!(slot, error = %err, "save payload is corrupt, ignoring it");
                Ok(None)
            }
        }
    }

    pub fn clear(&mut self, slot: &str) -> Result<bool, PersistenceError> {
        let removed = self
            .conn
            .execute("DELETE FROM saves WHERE slot = ?1", params![slot])?;
        Ok(removed > 0)
    }

    pub fn list_slots(&self) -> Result<Vec<SaveSlotSummary>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT slot, schema_version, current_day, seed, saved_at
             FROM saves
             ORDER BY slot ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SaveSlotSummary {
                slot: row.get(0)?,
                schema_version: row.get(1)?,
                current_day: clamp_to_i32(row.get::<_, i64>(2)?),
                seed: clamp_to_i32(row.get::<_, i64>(3)?),
                saved_at: row.get(4)?,
            })
        })?;

        let mut slots = Vec::new();
        for row in rows {
            slots.push(row?);
        }
        Ok(slots)
    }

    fn configure(&mut self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS saves (
                slot TEXT PRIMARY KEY,
                schema_version TEXT NOT NULL,
                current_day INTEGER NOT NULL,
                seed INTEGER NOT NULL,
                payload_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            ",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name, applied_at)
             VALUES(1, 'initial_v1', 'day-0000')",
            [],
        )?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn day_stamp(day: i32) -> String {
    format!("day-{day:04}")
}
