//! ============================================================================
//! Selection Manager - The only way to mutate a selection
//! ============================================================================
//! - `set_base` swaps the dice and runs the repair cascade
//! - `select` changes one non-dice category and never touches the others
//! - Blocked, locked or unknown choices are refused with no state change
//! ============================================================================

use tracing::{debug, info, warn};

use super::{repair_detailed, ClearedEntry};
use crate::catalog::Catalog;
use crate::compat::RuleBook;
use crate::error::SelectionError;
use crate::layers::compose;
use crate::types::{Category, Item, Selection};

/// Owns one user's selection together with the catalog and rules it is
/// validated against. Single owner; wrap in a lock before sharing.
#[derive(Debug, Clone)]
pub struct SelectionManager {
    catalog: Catalog,
    rules: RuleBook,
    selection: Selection,
}

impl SelectionManager {
    /// Start with nothing selected
    pub fn new(catalog: Catalog, rules: RuleBook) -> Self {
        Self {
            catalog,
            rules,
            selection: Selection::default(),
        }
    }

    /// Start from a previously saved selection, repairing it first so a
    /// payload saved under different rules or catalog content is never
    /// exposed as-is. Returns the entries that had to be cleared.
    pub fn restore(catalog: Catalog, rules: RuleBook, saved: &Selection) -> (Self, Vec<ClearedEntry>) {
        let outcome = repair_detailed(saved, &catalog, &rules);

        for entry in &outcome.cleared {
            warn!(
                "Dropped saved {} {} ({:?})",
                entry.category, entry.resource_ref, entry.reason
            );
        }
        info!(
            "Restored selection ({} entries cleared)",
            outcome.cleared.len()
        );

        let manager = Self {
            catalog,
            rules,
            selection: outcome.selection,
        };
        (manager, outcome.cleared)
    }

    /// Current selection (read-only)
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Change one category. `None` clears it and is always accepted.
    /// Choosing the dice goes through `set_base`.
    pub fn select(&mut self, category: Category, resource_ref: Option<&str>) -> Result<(), SelectionError> {
        if category == Category::Base {
            return self.set_base(resource_ref).map(|_| ());
        }

        let Some(resource_ref) = resource_ref else {
            self.selection.set(category, None);
            debug!("Cleared {}", category);
            return Ok(());
        };

        let item = self.lookup(category, resource_ref)?;

        // A pattern is only drawn on a dice
        let needs_base = category == Category::Pattern && self.selection.base.is_none();
        if needs_base || self.is_blocked(category, item) {
            let err = SelectionError::Blocked {
                category,
                resource_ref: resource_ref.to_string(),
            };
            warn!("Rejected selection: {}", err);
            return Err(err);
        }

        self.selection.set(category, Some(resource_ref.to_string()));
        info!("Selected {} = {}", category, resource_ref);
        Ok(())
    }

    /// Swap the dice and clear everything it is incompatible with.
    /// Returns the entries the cascade cleared.
    pub fn set_base(&mut self, resource_ref: Option<&str>) -> Result<Vec<ClearedEntry>, SelectionError> {
        if let Some(resource_ref) = resource_ref {
            self.lookup(Category::Base, resource_ref)?;
        }

        let mut next = self.selection.clone();
        next.set(Category::Base, resource_ref.map(str::to_string));
        let outcome = repair_detailed(&next, &self.catalog, &self.rules);
        self.selection = outcome.selection;

        info!(
            "Dice set to {} ({} selections cleared)",
            resource_ref.unwrap_or("none"),
            outcome.cleared.len()
        );
        Ok(outcome.cleared)
    }

    /// Whether an option is disabled under the current dice
    pub fn is_blocked(&self, category: Category, item: &Item) -> bool {
        self.rules
            .is_blocked(self.selection.base.as_deref(), category, item)
    }

    /// Whether the user may not pick this item yet
    pub fn is_locked(&self, item: &Item) -> bool {
        item.locked
    }

    /// Display order for a category
    pub fn ranked(&self, category: Category) -> &[Item] {
        self.catalog.ranked(category)
    }

    /// Layer stack for the current selection
    pub fn layers(&self) -> Vec<String> {
        compose(&self.selection)
    }

    /// Catalog item for a choice, refusing unknown and locked items
    fn lookup(&self, category: Category, resource_ref: &str) -> Result<&Item, SelectionError> {
        let item = self.catalog.find(category, resource_ref).ok_or_else(|| {
            SelectionError::UnknownItem {
                category,
                resource_ref: resource_ref.to_string(),
            }
        })?;

        if self.is_locked(item) {
            let err = SelectionError::Locked {
                category,
                resource_ref: resource_ref.to_string(),
            };
            warn!("Rejected selection: {}", err);
            return Err(err);
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{repair, ClearReason};
    use super::*;

    fn manager_with(base: &str) -> SelectionManager {
        let saved = Selection {
            background: Some(BG_WHITE.into()),
            base: Some(base.into()),
            pattern: Some(PATTERN_123.into()),
            hat: Some(CONE.into()),
            ..Selection::default()
        };
        SelectionManager::restore(catalog(), RuleBook::default(), &saved).0
    }

    #[test]
    fn test_set_base_cascade_scenario() {
        let mut manager = manager_with(WHITE);
        manager.select(Category::Accessory, Some(BOW)).unwrap();

        let cleared = manager.set_base(Some(BOX)).unwrap();
        let sel = manager.selection();
        assert_eq!(sel.base.as_deref(), Some(BOX));
        assert_eq!(sel.pattern, None);
        assert_eq!(sel.hat.as_deref(), Some(CONE));
        assert_eq!(sel.accessory.as_deref(), Some(BOW));
        assert_eq!(sel.background.as_deref(), Some(BG_WHITE));
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].reason, ClearReason::Blocked);
    }

    #[test]
    fn test_wildcard_hat_cleared_and_reselect_rejected() {
        let mut rules = RuleBook::default();
        // BoxDice variant that also blocks every hat
        rules.insert(
            "box",
            crate::compat::CompatibilityRule::no_patterns()
                .with_hats(crate::compat::CategoryBlock::FullyBlocked),
        );
        let saved = Selection {
            base: Some(WHITE.into()),
            pattern: Some(PATTERN_123.into()),
            hat: Some(CONE.into()),
            ..Selection::default()
        };
        let (mut manager, _) = SelectionManager::restore(catalog(), rules, &saved);

        manager.set_base(Some(BOX)).unwrap();
        assert_eq!(manager.selection().pattern, None);
        assert_eq!(manager.selection().hat, None);

        let before = manager.selection().clone();
        let err = manager.select(Category::Hat, Some(CONE)).unwrap_err();
        assert!(matches!(err, SelectionError::Blocked { category: Category::Hat, .. }));
        assert_eq!(manager.selection(), &before);
    }

    #[test]
    fn test_select_does_not_cascade() {
        let mut manager = manager_with(WHITE);
        let before = manager.selection().clone();

        manager.select(Category::Item, Some(SWORD)).unwrap();
        for (category, value) in manager.selection().entries() {
            if category == Category::Item {
                assert_eq!(value, Some(SWORD));
            } else {
                assert_eq!(value, before.get(category));
            }
        }
    }

    #[test]
    fn test_select_locked_rejected() {
        let mut manager = manager_with(WHITE);
        let before = manager.selection().clone();

        let err = manager.select(Category::Hat, Some(CROWN)).unwrap_err();
        assert!(matches!(err, SelectionError::Locked { .. }));
        let err = manager.set_base(Some(GIFT)).unwrap_err();
        assert_eq!(err.category(), Category::Base);
        assert_eq!(manager.selection(), &before);
    }

    #[test]
    fn test_select_unknown_rejected() {
        let mut manager = manager_with(WHITE);
        let err = manager
            .select(Category::Companion, Some("/dice/Companions/Nope.svg"))
            .unwrap_err();
        assert!(matches!(err, SelectionError::UnknownItem { .. }));
        // A ref from another category is unknown here too
        assert!(manager.select(Category::Item, Some(MEEPLE)).is_err());
    }

    #[test]
    fn test_pattern_needs_base() {
        let mut manager = manager_with(WHITE);
        manager.set_base(None).unwrap();
        assert_eq!(manager.selection().pattern, None);

        let err = manager.select(Category::Pattern, Some(PATTERN_123)).unwrap_err();
        assert!(matches!(err, SelectionError::Blocked { .. }));
        assert_eq!(manager.selection().pattern, None);
    }

    #[test]
    fn test_select_base_routes_through_cascade() {
        let mut manager = manager_with(WHITE);
        manager.select(Category::Base, Some(ICECUBE)).unwrap();
        assert_eq!(manager.selection().base.as_deref(), Some(ICECUBE));
        assert_eq!(manager.selection().hat, None);
        assert_eq!(manager.selection().pattern, None);
    }

    #[test]
    fn test_clearing_always_allowed() {
        let mut manager = manager_with(ICECUBE);
        manager.select(Category::Hat, None).unwrap();
        manager.select(Category::Background, None).unwrap();
        assert_eq!(manager.selection().background, None);
    }

    #[test]
    fn test_cascade_totality_for_every_base() {
        let bases: Vec<String> = catalog()
            .ranked(Category::Base)
            .iter()
            .filter(|i| !i.locked)
            .map(|i| i.resource_ref.clone())
            .collect();

        for base in &bases {
            let mut manager = manager_with(WHITE);
            manager.select(Category::Accessory, Some(BELT)).unwrap();
            manager.set_base(Some(base.as_str())).unwrap();

            for category in Category::ALL {
                if category == Category::Base {
                    continue;
                }
                if let Some(r) = manager.selection().get(category) {
                    let item = manager.catalog().find(category, r).unwrap();
                    assert!(!manager.is_blocked(category, item), "{} left blocked under {}", category, base);
                }
            }
            // The state a manager exposes is always a repair fixed point
            let sel = manager.selection().clone();
            assert_eq!(repair(&sel, manager.catalog(), manager.rules()), sel);
        }
    }

    #[test]
    fn test_restore_keeps_locked_saved_items() {
        let saved = Selection {
            base: Some(GIFT.into()),
            hat: Some(CROWN.into()),
            ..Selection::default()
        };
        let (manager, cleared) = SelectionManager::restore(catalog(), RuleBook::default(), &saved);
        assert_eq!(manager.selection().base.as_deref(), Some(GIFT));
        // Gift blocks every hat
        assert_eq!(manager.selection().hat, None);
        assert_eq!(cleared.len(), 1);
    }

    #[test]
    fn test_layers_follow_selection() {
        let mut manager = manager_with(WHITE);
        assert_eq!(manager.layers(), vec![BG_WHITE, WHITE, PATTERN_123, CONE]);
        manager.select(Category::Title, Some(KING)).unwrap();
        assert_eq!(manager.layers().len(), 4);
    }

    #[test]
    fn test_read_queries() {
        let manager = manager_with(ICECUBE);
        let cone = manager.catalog().find(Category::Hat, CONE).unwrap().clone();
        assert!(manager.is_blocked(Category::Hat, &cone));
        assert!(!manager.is_locked(&cone));
        assert_eq!(manager.ranked(Category::Accessory)[0].resource_ref, BOW);
    }
}
