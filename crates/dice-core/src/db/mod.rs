// ============================================================================
// DiceDb - Embedded Database (redb)
// ============================================================================
// Persistent local storage for saved selections, keyed by user id.
// Default path: ~/.my-dice/selections.redb (override via MY_DICE_DB_PATH env var)
// ============================================================================

pub mod types;

pub use types::{DbStats, SavedSelection};

use anyhow::{anyhow, Result};
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::session::SelectionStore;
use crate::types::Selection;

// Table definitions
const SELECTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("selections");

/// Env var overriding the database location
pub const DB_PATH_ENV_VAR: &str = "MY_DICE_DB_PATH";

/// Embedded database for saved dice selections
pub struct DiceDb {
    db: Database,
    path: PathBuf,
}

impl DiceDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses MY_DICE_DB_PATH env var or ~/.my-dice/selections.redb
    pub fn open(path: Option<&str>) -> Result<Self> {
        let db_path = if let Some(p) = path {
            PathBuf::from(p)
        } else if let Ok(env_path) = std::env::var(DB_PATH_ENV_VAR) {
            PathBuf::from(env_path)
        } else {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
            let dice_dir = home.join(".my-dice");
            std::fs::create_dir_all(&dice_dir)
                .map_err(|e| anyhow!("Failed to create .my-dice directory: {}", e))?;
            dice_dir.join("selections.redb")
        };

        info!("Opening database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure tables exist by doing a write transaction
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(SELECTIONS)
                .map_err(|e| anyhow!("Failed to create selections table: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self { db, path: db_path })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_selection(&self, user_id: &str, selection: &Selection) -> Result<SavedSelection> {
        let record = SavedSelection {
            user_id: user_id.to_string(),
            selection: selection.clone(),
            saved_at: chrono::Utc::now().timestamp(),
        };
        let key = format!("selections:{}", user_id);
        let value = bincode::serialize(&record)
            .map_err(|e| anyhow!("Failed to serialize selection: {}", e))?;

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn.open_table(SELECTIONS)
                .map_err(|e| anyhow!("Failed to open selections table: {}", e))?;
            table.insert(key.as_str(), value.as_slice())
                .map_err(|e| anyhow!("Failed to insert selection: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Stored selection for user: {}", user_id);
        Ok(record)
    }

    pub fn get_selection(&self, user_id: &str) -> Result<Option<SavedSelection>> {
        let key = format!("selections:{}", user_id);

        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(SELECTIONS)
            .map_err(|e| anyhow!("Failed to open selections table: {}", e))?;

        match table.get(key.as_str()).map_err(|e| anyhow!("Failed to get selection: {}", e))? {
            Some(value) => {
                let record: SavedSelection = bincode::deserialize(value.value())
                    .map_err(|e| anyhow!("Failed to deserialize selection: {}", e))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub fn list_selections(&self) -> Result<Vec<SavedSelection>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(SELECTIONS)
            .map_err(|e| anyhow!("Failed to open selections table: {}", e))?;

        let mut results = Vec::new();
        let iter = table.range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate selections: {}", e))?;
        for entry in iter {
            let (_key, value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
            let record: SavedSelection = bincode::deserialize(value.value())
                .map_err(|e| anyhow!("Failed to deserialize selection: {}", e))?;
            results.push(record);
        }
        Ok(results)
    }

    pub fn delete_selection(&self, user_id: &str) -> Result<bool> {
        let key = format!("selections:{}", user_id);

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn.open_table(SELECTIONS)
                .map_err(|e| anyhow!("Failed to open selections table: {}", e))?;
            removed = table.remove(key.as_str())
                .map_err(|e| anyhow!("Failed to remove selection: {}", e))?
                .is_some();
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Deleted selection for user: {}", user_id);
        }
        Ok(removed)
    }

    pub fn stats(&self) -> Result<DbStats> {
        let selections = self.list_selections()?;
        Ok(DbStats {
            total_selections: selections.len(),
            last_saved_at: selections.iter().map(|s| s.saved_at).max(),
        })
    }
}

impl SelectionStore for DiceDb {
    fn load(&self, user_id: &str) -> Result<Option<Selection>> {
        Ok(self.get_selection(user_id)?.map(|record| record.selection))
    }

    fn save(&self, user_id: &str, selection: &Selection) -> Result<()> {
        self.store_selection(user_id, selection).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, DiceDb) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.redb");
        let db = DiceDb::open(path.to_str()).unwrap();
        (dir, db)
    }

    fn sample() -> Selection {
        Selection {
            base: Some("/dice/Dice/WhiteDice.svg".into()),
            pattern: Some("/dice/Patterns/1-2-3.svg".into()),
            ..Selection::default()
        }
    }

    #[test]
    fn test_store_and_get() {
        let (_dir, db) = open_temp();
        assert!(db.get_selection("alice").unwrap().is_none());

        db.store_selection("alice", &sample()).unwrap();
        let record = db.get_selection("alice").unwrap().unwrap();
        assert_eq!(record.user_id, "alice");
        assert_eq!(record.selection, sample());
        assert!(record.saved_at > 0);
    }

    #[test]
    fn test_store_overwrites() {
        let (_dir, db) = open_temp();
        db.store_selection("alice", &sample()).unwrap();
        db.store_selection("alice", &Selection::default()).unwrap();

        let record = db.get_selection("alice").unwrap().unwrap();
        assert!(record.selection.is_empty());
        assert_eq!(db.list_selections().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_and_stats() {
        let (_dir, db) = open_temp();
        db.store_selection("alice", &sample()).unwrap();
        db.store_selection("bob", &sample()).unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_selections, 2);
        assert!(stats.last_saved_at.is_some());

        assert!(db.delete_selection("alice").unwrap());
        assert!(!db.delete_selection("alice").unwrap());
        assert_eq!(db.stats().unwrap().total_selections, 1);
    }

    #[test]
    fn test_selection_store_impl() {
        let (_dir, db) = open_temp();
        let store: &dyn SelectionStore = &db;
        store.save("carol", &sample()).unwrap();
        assert_eq!(store.load("carol").unwrap(), Some(sample()));
        assert_eq!(store.load("dave").unwrap(), None);
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.redb");
        {
            let db = DiceDb::open(path.to_str()).unwrap();
            db.store_selection("alice", &sample()).unwrap();
        }
        let db = DiceDb::open(path.to_str()).unwrap();
        assert_eq!(db.path(), path.as_path());
        assert!(db.get_selection("alice").unwrap().is_some());
    }
}
