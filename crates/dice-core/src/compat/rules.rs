//! ============================================================================
//! Compatibility Rules - What a dice forbids
//! ============================================================================
//! On the wire a category block keeps the list form used by the catalog
//! service (`[]`, `["*"]`, `["belt"]`); in memory it is a tagged union so
//! the wildcard is its own variant.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::normalize::normalize;
use crate::types::{Category, Item};

/// Wire sentinel for "entire category blocked"
pub const WILDCARD: &str = "*";

/// Restriction a dice places on one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum CategoryBlock {
    /// Everything allowed
    #[default]
    Unrestricted,
    /// Items whose lowercased name contains any of these substrings
    Blocked(Vec<String>),
    /// Nothing allowed
    FullyBlocked,
}

impl CategoryBlock {
    /// Check whether an item name falls under this block
    pub fn blocks(&self, item_name: &str) -> bool {
        match self {
            CategoryBlock::Unrestricted => false,
            CategoryBlock::FullyBlocked => true,
            CategoryBlock::Blocked(substrings) => {
                let lower = item_name.to_lowercase();
                substrings
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .any(|s| lower.contains(s.as_str()))
            }
        }
    }
}

impl From<Vec<String>> for CategoryBlock {
    fn from(entries: Vec<String>) -> Self {
        if entries.iter().any(|e| e.trim() == WILDCARD) {
            return CategoryBlock::FullyBlocked;
        }
        // Empty substrings would match every name
        let substrings: Vec<String> = entries
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if substrings.is_empty() {
            CategoryBlock::Unrestricted
        } else {
            CategoryBlock::Blocked(substrings)
        }
    }
}

impl From<CategoryBlock> for Vec<String> {
    fn from(block: CategoryBlock) -> Self {
        match block {
            CategoryBlock::Unrestricted => Vec::new(),
            CategoryBlock::Blocked(substrings) => substrings,
            CategoryBlock::FullyBlocked => vec![WILDCARD.to_string()],
        }
    }
}

/// Restrictions for one dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRule {
    #[serde(default = "default_patterns_allowed")]
    pub patterns_allowed: bool,
    #[serde(default)]
    pub blocked_accessories: CategoryBlock,
    #[serde(default)]
    pub blocked_hats: CategoryBlock,
}

fn default_patterns_allowed() -> bool {
    true
}

impl Default for CompatibilityRule {
    fn default() -> Self {
        Self {
            patterns_allowed: true,
            blocked_accessories: CategoryBlock::Unrestricted,
            blocked_hats: CategoryBlock::Unrestricted,
        }
    }
}

impl CompatibilityRule {
    /// Rule that only forbids patterns
    pub fn no_patterns() -> Self {
        Self {
            patterns_allowed: false,
            ..Self::default()
        }
    }

    pub fn with_accessories(mut self, block: CategoryBlock) -> Self {
        self.blocked_accessories = block;
        self
    }

    pub fn with_hats(mut self, block: CategoryBlock) -> Self {
        self.blocked_hats = block;
        self
    }

    /// Check a category/item pair against this rule
    pub fn blocks(&self, category: Category, item_name: &str) -> bool {
        match category {
            Category::Pattern => !self.patterns_allowed,
            Category::Accessory => self.blocked_accessories.blocks(item_name),
            Category::Hat => self.blocked_hats.blocks(item_name),
            Category::Background
            | Category::Base
            | Category::Item
            | Category::Companion
            | Category::Title => false,
        }
    }
}

/// Compatibility rules keyed by normalized dice identifier.
/// Keys read from a file go through `insert`, so `"Gift"` and `"GiftDice"`
/// both land on `gift`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, CompatibilityRule>",
    into = "BTreeMap<String, CompatibilityRule>"
)]
pub struct RuleBook {
    rules: BTreeMap<String, CompatibilityRule>,
}

impl RuleBook {
    /// Rule book with no restrictions at all
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace the rule for a dice key (e.g. `"icecube"`).
    /// The key is normalized like a dice ref.
    pub fn insert(&mut self, key: &str, rule: CompatibilityRule) {
        self.rules.insert(normalize(key.trim(), Category::Base), rule);
    }

    /// Rule for a selected dice, if it has one
    pub fn rule_for(&self, base_ref: &str) -> Option<&CompatibilityRule> {
        self.rules.get(&normalize(base_ref, Category::Base))
    }

    /// Check whether `item` is disabled in `category` while `base` is selected.
    /// Pure: no dice, or a dice without a rule, blocks nothing.
    pub fn is_blocked(&self, base: Option<&str>, category: Category, item: &Item) -> bool {
        self.is_name_blocked(base, category, &item.name)
    }

    /// Same as `is_blocked`, matching against a bare item name
    pub fn is_name_blocked(&self, base: Option<&str>, category: Category, item_name: &str) -> bool {
        match base.and_then(|b| self.rule_for(b)) {
            Some(rule) => rule.blocks(category, item_name),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<BTreeMap<String, CompatibilityRule>> for RuleBook {
    fn from(entries: BTreeMap<String, CompatibilityRule>) -> Self {
        let mut book = Self::empty();
        for (key, rule) in entries {
            book.insert(&key, rule);
        }
        book
    }
}

impl From<RuleBook> for BTreeMap<String, CompatibilityRule> {
    fn from(book: RuleBook) -> Self {
        book.rules
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        let mut book = Self::empty();
        book.insert("box", CompatibilityRule::no_patterns());
        book.insert(
            "dice-skull",
            CompatibilityRule::no_patterns()
                .with_accessories(CategoryBlock::Blocked(vec!["belt".into()])),
        );
        book.insert(
            "gift",
            CompatibilityRule::no_patterns().with_hats(CategoryBlock::FullyBlocked),
        );
        book.insert(
            "icecube",
            CompatibilityRule::no_patterns()
                .with_accessories(CategoryBlock::FullyBlocked)
                .with_hats(CategoryBlock::FullyBlocked),
        );
        book.insert("rubik", CompatibilityRule::no_patterns());
        book.insert(
            "safe",
            CompatibilityRule::no_patterns()
                .with_accessories(CategoryBlock::Blocked(vec!["blush".into()])),
        );
        book
    }
}
