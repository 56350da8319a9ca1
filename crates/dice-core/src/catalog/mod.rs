//! ============================================================================
//! Catalog Module - Ranked cosmetic items per category
//! ============================================================================
//! Holds the live catalog supplied by the catalog service, already sorted
//! into display order. Unlock state (`locked`) is supplied data and is never
//! computed here.
//!
//! ## Catalog file
//! ```json
//! {
//!   "background": [{ "id": "...", "name": "WhiteBackground", "src": "/dice/Backgrounds/WhiteBackground.svg", "requiredLevel": 1 }],
//!   "dice": [ ... ]
//! }
//! ```
//! ============================================================================

mod display;
mod rank;

pub use display::{display_name, ranking_name, thumbnail_path};
pub use rank::{RankTable, RankTables, UNRANKED};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::compat::RuleBook;
use crate::error::ConfigError;
use crate::types::{Category, Item};

/// Env var naming the catalog file
pub const CATALOG_ENV_VAR: &str = "MY_DICE_CATALOG";

/// Catalog items for every category, in display order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: BTreeMap<Category, Vec<Item>>,
}

/// Presentation state of one option in a category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionState {
    pub resource_ref: String,
    pub display_name: String,
    pub required_level: Option<u32>,
    pub level_name: Option<String>,
    pub locked: bool,
    /// Disabled because of the current dice
    pub blocked: bool,
    /// Only set for reward-tier items
    pub reward_description: Option<String>,
}

impl Catalog {
    /// Build a catalog from raw per-category lists, ranking each one
    pub fn new(items: BTreeMap<Category, Vec<Item>>, tables: &RankTables) -> Self {
        let categories = items
            .into_iter()
            .map(|(category, list)| {
                let ranked = tables.rank(category, &list);
                (category, ranked)
            })
            .collect();
        Self { categories }
    }

    /// Load a catalog JSON file and rank it
    pub fn load(path: &Path, tables: &RankTables) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let items: BTreeMap<Category, Vec<Item>> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = Self::new(items, tables);
        info!(
            "Loaded catalog from {} ({} items)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Items of a category in display order
    pub fn ranked(&self, category: Category) -> &[Item] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find an item of a category by its resource ref
    pub fn find(&self, category: Category, resource_ref: &str) -> Option<&Item> {
        self.ranked(category)
            .iter()
            .find(|item| item.resource_ref == resource_ref)
    }

    /// First unlocked item of a category in display order
    pub fn first_unlocked(&self, category: Category) -> Option<&Item> {
        self.ranked(category).iter().find(|item| !item.locked)
    }

    /// Total item count across categories
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Option list for a category, flagging items disabled under `base`
    pub fn option_states(
        &self,
        category: Category,
        base: Option<&str>,
        rules: &RuleBook,
    ) -> Vec<OptionState> {
        let states: Vec<OptionState> = self
            .ranked(category)
            .iter()
            .map(|item| OptionState {
                resource_ref: item.resource_ref.clone(),
                display_name: display_name(&item.name),
                required_level: item.required_level,
                level_name: item.level_name.clone(),
                locked: item.locked,
                blocked: rules.is_blocked(base, category, item),
                reward_description: if item.is_reward_tier() {
                    item.description.clone()
                } else {
                    None
                },
            })
            .collect();

        debug!(
            "{} options for {} ({} blocked)",
            states.len(),
            category,
            states.iter().filter(|s| s.blocked).count()
        );
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Catalog {
        let mut items = BTreeMap::new();
        items.insert(
            Category::Hat,
            vec![
                Item::new("h2", "TopHat", "/dice/Hats/TopHat.svg").with_level(5),
                Item::new("h1", "Cone", "/dice/Hats/Cone.svg").with_level(2),
                Item::new("h3", "KingsCrown", "/dice/Hats/KingsCrown.svg")
                    .with_level(10)
                    .locked(),
            ],
        );
        items.insert(
            Category::Base,
            vec![
                Item::new("d1", "WhiteDice", "/dice/Dice/WhiteDice.svg").with_level(1),
                Item::new("d2", "GiftDice", "/dice/Dice/GiftDice.svg")
                    .with_level(0)
                    .locked()
                    .with_description("Gift dice - only unlockable by donating"),
            ],
        );
        Catalog::new(items, &RankTables::default())
    }

    #[test]
    fn test_catalog_is_ranked_on_build() {
        let catalog = sample();
        let hats: Vec<&str> = catalog.ranked(Category::Hat).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(hats, vec!["h1", "h2", "h3"]);
        assert_eq!(catalog.len(), 5);
        assert!(catalog.ranked(Category::Title).is_empty());
    }

    #[test]
    fn test_find_and_first_unlocked() {
        let catalog = sample();
        assert!(catalog.find(Category::Hat, "/dice/Hats/Cone.svg").is_some());
        assert!(catalog.find(Category::Base, "/dice/Hats/Cone.svg").is_none());
        assert_eq!(catalog.first_unlocked(Category::Base).unwrap().id, "d1");
        assert!(catalog.first_unlocked(Category::Pattern).is_none());
    }

    #[test]
    fn test_option_states() {
        let catalog = sample();
        let rules = RuleBook::default();

        let hats = catalog.option_states(Category::Hat, Some("/dice/Dice/GiftDice.svg"), &rules);
        assert!(hats.iter().all(|s| s.blocked));
        assert_eq!(hats[2].display_name, "King's Crown");
        assert!(hats[2].locked);

        let dice = catalog.option_states(Category::Base, None, &rules);
        assert_eq!(dice[0].reward_description, None);
        assert_eq!(
            dice[1].reward_description.as_deref(),
            Some("Gift dice - only unlockable by donating")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "dice": [{{"id": "d", "name": "BoxDice", "src": "/dice/Dice/BoxDice.svg", "locked": false, "requiredLevel": 3}}],
                "accessories": []
            }}"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path(), &RankTables::default()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find(Category::Base, "/dice/Dice/BoxDice.svg").is_some());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Catalog::load(file.path(), &RankTables::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
