//! ============================================================================
//! Core Types for the Dice Customizer
//! ============================================================================
//! Categories, catalog items, and the per-category selection payload.
//! These types are serialized to JSON for the catalog file and the
//! persistence collaborator.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cosmetic categories. `Base` (the dice itself) drives compatibility
/// for every other category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Background,
    #[serde(alias = "dice")]
    Base,
    Pattern,
    #[serde(alias = "accessories")]
    Accessory,
    Hat,
    Item,
    Companion,
    Title,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 8] = [
        Category::Background,
        Category::Base,
        Category::Pattern,
        Category::Accessory,
        Category::Hat,
        Category::Item,
        Category::Companion,
        Category::Title,
    ];

    /// Get human-readable category label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Background => "Background",
            Category::Base => "Dice",
            Category::Pattern => "Pattern",
            Category::Accessory => "Accessories",
            Category::Hat => "Crowns & Hats",
            Category::Item => "Item",
            Category::Companion => "Companion",
            Category::Title => "Title",
        }
    }

    /// Label shown for the empty choice of this category
    pub fn none_label(&self) -> &'static str {
        match self {
            Category::Pattern => "No Pattern",
            Category::Accessory => "No Accessory",
            Category::Hat => "Nothing",
            Category::Item => "No Item",
            Category::Companion => "No Companion",
            Category::Title => "No Title",
            Category::Background | Category::Base => "None",
        }
    }

    /// Parse a category from user input (accepts catalog service keys too)
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "background" | "backgrounds" => Some(Category::Background),
            "base" | "dice" => Some(Category::Base),
            "pattern" | "patterns" => Some(Category::Pattern),
            "accessory" | "accessories" => Some(Category::Accessory),
            "hat" | "hats" | "crowns & hats" => Some(Category::Hat),
            "item" | "items" => Some(Category::Item),
            "companion" | "companions" => Some(Category::Companion),
            "title" | "titles" => Some(Category::Title),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Background => "background",
            Category::Base => "base",
            Category::Pattern => "pattern",
            Category::Accessory => "accessory",
            Category::Hat => "hat",
            Category::Item => "item",
            Category::Companion => "companion",
            Category::Title => "title",
        };
        f.write_str(name)
    }
}

/// One selectable cosmetic asset, as supplied by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    /// Raw display name (may still carry a "thumbnail" suffix)
    pub name: String,
    /// Path to the visual resource, e.g. `/dice/Dice/BoxDice.svg`
    #[serde(alias = "src")]
    pub resource_ref: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub required_level: Option<u32>,
    #[serde(default)]
    pub level_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Item {
    /// Create an unlocked item with no level requirement
    pub fn new(id: impl Into<String>, name: impl Into<String>, resource_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_ref: resource_ref.into(),
            locked: false,
            required_level: None,
            level_name: None,
            description: None,
        }
    }

    /// Set the unlock level
    pub fn with_level(mut self, level: u32) -> Self {
        self.required_level = Some(level);
        self
    }

    /// Mark the item as locked for the current user
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Set the supplementary description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reward-tier items (level 0 or no level at all) are unlocked by
    /// special means and always sort last.
    pub fn is_reward_tier(&self) -> bool {
        matches!(self.required_level, None | Some(0))
    }
}

/// Current choice for every category. `None` means nothing selected.
///
/// Serializes as the payload exchanged with the persistence collaborator:
/// an object keyed by category holding a resource ref or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub background: Option<String>,
    #[serde(alias = "dice")]
    pub base: Option<String>,
    pub pattern: Option<String>,
    #[serde(alias = "accessories")]
    pub accessory: Option<String>,
    pub hat: Option<String>,
    pub item: Option<String>,
    pub companion: Option<String>,
    pub title: Option<String>,
}

impl Selection {
    /// Get the resource ref selected for a category
    pub fn get(&self, category: Category) -> Option<&str> {
        self.slot(category).as_deref()
    }

    /// Replace the entry for a category. Bypasses all rules; only the
    /// selection manager and repair pass should call this.
    pub(crate) fn set(&mut self, category: Category, resource_ref: Option<String>) {
        *self.slot_mut(category) = resource_ref;
    }

    /// Clear every entry
    pub fn clear(&mut self) {
        *self = Selection::default();
    }

    /// True if no category has a selection
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Iterate `(category, selected ref)` in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (Category, Option<&str>)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    fn slot(&self, category: Category) -> &Option<String> {
        match category {
            Category::Background => &self.background,
            Category::Base => &self.base,
            Category::Pattern => &self.pattern,
            Category::Accessory => &self.accessory,
            Category::Hat => &self.hat,
            Category::Item => &self.item,
            Category::Companion => &self.companion,
            Category::Title => &self.title,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Background => &mut self.background,
            Category::Base => &mut self.base,
            Category::Pattern => &mut self.pattern,
            Category::Accessory => &mut self.accessory,
            Category::Hat => &mut self.hat,
            Category::Item => &mut self.item,
            Category::Companion => &mut self.companion,
            Category::Title => &mut self.title,
        }
    }
}
