//! ============================================================================
//! Catalog Ranking - Deterministic display order per category
//! ============================================================================
//! Sort key, in order:
//! 1. Reward tier (level 0 or unset) sorts after every leveled item
//! 2. Required level ascending
//! 3. Keyword rank from the category's `RankTable`
//! 4. Raw name, then id and resource ref so the order is total
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::display::ranking_name;
use crate::types::{Category, Item};

/// Rank given to names that match no keyword
pub const UNRANKED: u32 = u32::MAX;

/// Ordered `(keyword, rank)` pairs. The first keyword contained in the
/// cleaned name wins, so more specific keywords must come first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable(pub Vec<(String, u32)>);

impl RankTable {
    fn from_static(entries: &[(&str, u32)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(keyword, rank)| (keyword.to_string(), *rank))
                .collect(),
        )
    }

    /// Rank of a raw item name; `UNRANKED` when nothing matches
    pub fn rank_of(&self, name: &str) -> u32 {
        let cleaned = ranking_name(name);
        self.0
            .iter()
            .find(|(keyword, _)| cleaned.contains(keyword.as_str()))
            .map(|(_, rank)| *rank)
            .unwrap_or(UNRANKED)
    }
}

/// Rank tables for every category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTables(BTreeMap<Category, RankTable>);

impl RankTables {
    /// Tables with no keywords at all (order falls back to level and name)
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Get the table for a category (empty if none configured)
    pub fn table(&self, category: Category) -> &RankTable {
        static EMPTY: RankTable = RankTable(Vec::new());
        self.0.get(&category).unwrap_or(&EMPTY)
    }

    /// Replace the table for a category
    pub fn set_table(&mut self, category: Category, table: RankTable) {
        self.0.insert(category, table);
    }

    /// Produce the display order for a category's items
    pub fn rank(&self, category: Category, items: &[Item]) -> Vec<Item> {
        let table = self.table(category);
        let mut ranked = items.to_vec();
        ranked.sort_by_cached_key(|item| {
            (
                item.is_reward_tier(),
                item.required_level.unwrap_or(0),
                table.rank_of(&item.name),
                item.name.to_lowercase(),
                item.name.clone(),
                item.id.clone(),
                item.resource_ref.clone(),
            )
        });
        ranked
    }
}

impl Default for RankTables {
    fn default() -> Self {
        let mut tables = BTreeMap::new();

        tables.insert(
            Category::Background,
            RankTable::from_static(&[
                ("white", 0),
                ("black", 1),
                ("blue", 2),
                ("green", 3),
                ("red", 4),
                ("yellow", 5),
                ("gameboard", 6),
                ("chessboard", 7),
                ("casino", 8),
                ("cardgame", 9),
            ]),
        );

        tables.insert(
            Category::Base,
            RankTable::from_static(&[
                ("white", 0),
                ("black", 1),
                ("blue", 2),
                ("green", 3),
                ("orange", 4),
                ("pink", 5),
                ("purple", 6),
                ("red", 7),
                ("yellow", 8),
                ("box", 9),
                ("icecube", 10),
                ("rubik", 11),
                ("dice skull", 12),
                ("dice-skull", 12),
                ("safe", 13),
            ]),
        );

        // Numbered patterns are matched with or without dashes
        tables.insert(
            Category::Pattern,
            RankTable::from_static(&[
                ("1-2-3", 0),
                ("123", 0),
                ("2-1-4", 1),
                ("214", 1),
                ("3-6-5", 2),
                ("365", 2),
                ("4-5-6", 3),
                ("456", 3),
                ("5-4-1", 4),
                ("541", 4),
                ("6-3-2", 5),
                ("632", 5),
                ("abc", 6),
                ("mistery", 7),
                ("suits", 8),
                ("elements", 9),
            ]),
        );

        tables.insert(
            Category::Accessory,
            RankTable::from_static(&[
                ("belt", 0),
                ("blush", 1),
                ("scar", 2),
                ("patch", 3),
                ("kingscape", 4),
            ]),
        );

        tables.insert(
            Category::Hat,
            RankTable::from_static(&[
                ("cone", 0),
                ("tophat", 1),
                ("sorcerer", 2),
                ("wizard", 3),
                ("prince", 4),
                ("king", 5),
            ]),
        );

        tables.insert(
            Category::Item,
            RankTable::from_static(&[
                ("manapotion", 0),
                ("healthpotion", 1),
                ("cardcastle", 2),
                ("pokerchips", 3),
                ("map", 4),
                ("coins", 5),
                ("shield", 6),
                ("mace", 7),
                ("bomb", 8),
                ("staff", 9),
                ("spellbook", 10),
                ("sword", 11),
                ("holygrail", 12),
            ]),
        );

        tables.insert(
            Category::Companion,
            RankTable::from_static(&[
                ("meeple", 0),
                ("mini dice", 1),
                ("chessknight", 2),
                ("dice skull", 3),
                ("dice-skull", 3),
                ("eightball", 4),
                ("mimic", 5),
            ]),
        );

        // First match wins: "baroness" ranks with "baron", "princess" with "prince"
        tables.insert(
            Category::Title,
            RankTable::from_static(&[
                ("commoner", 0),
                ("squire", 1),
                ("knight", 2),
                ("champion", 3),
                ("baron", 4),
                ("baroness", 5),
                ("lord", 6),
                ("lady", 7),
                ("archmage", 8),
                ("duke", 9),
                ("duchess", 10),
                ("prince", 11),
                ("princess", 12),
                ("king", 13),
                ("queen", 14),
            ]),
        );

        Self(tables)
    }
}
