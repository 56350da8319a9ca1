//! ============================================================================
//! Selection Module - Per-category choices and the repair cascade
//! ============================================================================
//! `repair` is the single place where dependent selections get cleared.
//! It runs on every dice change and on session restore:
//!
//! ```text
//! saved / mutated selection
//!        ↓
//! drop refs missing from the catalog
//!        ↓
//! no dice? → clear pattern
//!        ↓
//! clear anything the dice's rule blocks
//!        ↓
//! valid selection
//! ```
//! ============================================================================

mod manager;

pub use manager::SelectionManager;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::compat::RuleBook;
use crate::types::{Category, Selection};

/// Why repair cleared an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    /// The ref is not in the live catalog for that category
    NotInCatalog,
    /// The selected dice blocks it
    Blocked,
    /// A pattern without a dice
    NoBase,
}

/// One entry removed by repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearedEntry {
    pub category: Category,
    pub resource_ref: String,
    pub reason: ClearReason,
}

/// Repaired selection plus what was removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub selection: Selection,
    pub cleared: Vec<ClearedEntry>,
}

/// Return a copy of `selection` that satisfies every invariant.
/// Repairing an already-valid selection returns it unchanged.
pub fn repair(selection: &Selection, catalog: &Catalog, rules: &RuleBook) -> Selection {
    repair_detailed(selection, catalog, rules).selection
}

/// `repair`, also reporting each cleared entry
pub fn repair_detailed(selection: &Selection, catalog: &Catalog, rules: &RuleBook) -> RepairOutcome {
    let mut repaired = selection.clone();
    let mut cleared = Vec::new();

    let mut clear = |sel: &mut Selection, category: Category, reason: ClearReason| {
        if let Some(resource_ref) = sel.get(category).map(str::to_string) {
            debug!("Clearing {} ({}): {:?}", category, resource_ref, reason);
            sel.set(category, None);
            cleared.push(ClearedEntry {
                category,
                resource_ref,
                reason,
            });
        }
    };

    for category in Category::ALL {
        let missing = repaired
            .get(category)
            .is_some_and(|r| catalog.find(category, r).is_none());
        if missing {
            clear(&mut repaired, category, ClearReason::NotInCatalog);
        }
    }

    let base = repaired.base.clone();
    if base.is_none() {
        clear(&mut repaired, Category::Pattern, ClearReason::NoBase);
    }

    for category in Category::ALL {
        if category == Category::Base {
            continue;
        }
        let blocked = repaired
            .get(category)
            .and_then(|r| catalog.find(category, r))
            .is_some_and(|item| rules.is_blocked(base.as_deref(), category, item));
        if blocked {
            clear(&mut repaired, category, ClearReason::Blocked);
        }
    }

    RepairOutcome {
        selection: repaired,
        cleared,
    }
}

impl Selection {
    /// Default look for a user with nothing saved: the first unlocked
    /// background and dice in display order, everything else none.
    pub fn starter(catalog: &Catalog) -> Selection {
        Selection::default().with_defaults(catalog)
    }

    /// Fill an empty background or dice with the starter picks.
    /// Other categories stay as they are.
    pub fn with_defaults(mut self, catalog: &Catalog) -> Selection {
        let pick = |category: Category| {
            catalog
                .first_unlocked(category)
                .map(|item| item.resource_ref.clone())
        };

        if self.background.is_none() {
            self.background = pick(Category::Background);
        }
        if self.base.is_none() {
            self.base = pick(Category::Base);
        }
        self
    }
}
