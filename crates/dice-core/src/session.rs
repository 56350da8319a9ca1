//! ============================================================================
//! Session - Load, edit and persist one user's selection
//! ============================================================================
//! A session restores the saved payload through the repair cascade, lets the
//! caller edit it through the manager, and writes it back only when it
//! changed. Users with nothing saved start from `Selection::starter`; a
//! saved payload missing its background or dice gets the same defaults.
//!
//! ## Usage
//! ```rust,ignore
//! let db = DiceDb::open(None)?;
//! let mut session = Session::open(&db, "alice", catalog, rules)?;
//! session.manager_mut().select(Category::Hat, Some("/dice/Crowns%20%26%20Hats/Cone.svg"))?;
//! session.commit(&db)?;
//! ```
//! ============================================================================

use anyhow::Result;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::compat::RuleBook;
use crate::selection::{ClearedEntry, SelectionManager};
use crate::types::Selection;

/// Persistence collaborator for selections, keyed by user id
pub trait SelectionStore {
    fn load(&self, user_id: &str) -> Result<Option<Selection>>;
    fn save(&self, user_id: &str, selection: &Selection) -> Result<()>;
}

/// One user's editing session
#[derive(Debug)]
pub struct Session {
    user_id: String,
    manager: SelectionManager,
    /// What the store holds, or None if nothing was saved yet
    persisted: Option<Selection>,
    repairs: Vec<ClearedEntry>,
}

impl Session {
    pub fn open(
        store: &dyn SelectionStore,
        user_id: &str,
        catalog: Catalog,
        rules: RuleBook,
    ) -> Result<Self> {
        let persisted = store.load(user_id)?;
        let initial = match &persisted {
            Some(saved) => saved.clone().with_defaults(&catalog),
            None => {
                debug!("No saved selection for {}, using starter", user_id);
                Selection::starter(&catalog)
            }
        };

        let (manager, repairs) = SelectionManager::restore(catalog, rules, &initial);
        info!("Opened session for {}", user_id);

        Ok(Self {
            user_id: user_id.to_string(),
            manager,
            persisted,
            repairs,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn manager(&self) -> &SelectionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SelectionManager {
        &mut self.manager
    }

    /// Entries cleared while restoring the saved payload
    pub fn repairs(&self) -> &[ClearedEntry] {
        &self.repairs
    }

    /// Whether the current selection differs from what is stored
    pub fn is_dirty(&self) -> bool {
        self.persisted.as_ref() != Some(self.manager.selection())
    }

    /// Save if dirty. Returns whether anything was written.
    pub fn commit(&mut self, store: &dyn SelectionStore) -> Result<bool> {
        if !self.is_dirty() {
            debug!("Selection for {} unchanged, skipping save", self.user_id);
            return Ok(false);
        }

        let selection = self.manager.selection().clone();
        store.save(&self.user_id, &selection)?;
        self.persisted = Some(selection);
        info!("Saved selection for {}", self.user_id);
        Ok(true)
    }
}
