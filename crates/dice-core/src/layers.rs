//! ============================================================================
//! Layer Composer - Selection to ordered visual layers
//! ============================================================================
//! Bottom to top: background, dice, pattern, accessory, hat, item, companion.
//! The title is shown next to the avatar, never drawn into it.
//! Compatibility rules are not re-checked here; the selection manager owns
//! them. One structural check is intentional: a pattern is printed on the
//! dice, so a pattern with no dice is skipped rather than drawn alone.
//! ============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{Category, Selection};

/// Fixed stacking order, bottom first
pub const LAYER_ORDER: [Category; 7] = [
    Category::Background,
    Category::Base,
    Category::Pattern,
    Category::Accessory,
    Category::Hat,
    Category::Item,
    Category::Companion,
];

/// Resource refs to draw, bottom first. Empty categories add nothing.
pub fn compose(selection: &Selection) -> Vec<String> {
    let has_base = selection.base.is_some();
    LAYER_ORDER
        .iter()
        .filter(|category| has_base || **category != Category::Pattern)
        .filter_map(|category| selection.get(*category))
        .map(str::to_string)
        .collect()
}

/// Everything the rendering collaborator needs for one composite image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderManifest {
    pub layers: Vec<String>,
    /// Shown separately from the image
    pub title: Option<String>,
}

impl RenderManifest {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            layers: compose(selection),
            title: selection.title.clone(),
        }
    }
}
