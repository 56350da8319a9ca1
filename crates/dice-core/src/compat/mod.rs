//! ============================================================================
//! Compat Module - Dice compatibility rules
//! ============================================================================
//! The selected dice (the `Base` category) can forbid patterns and block
//! accessories or hats, either entirely or by name substring.
//!
//! ## Rule lookup
//! - Rules are keyed by the dice's normalized identifier
//!   (`/dice/Dice/IceCubeDice.svg` -> `icecube`)
//! - A dice with no rule restricts nothing
//! - Background, item, companion and title are never restricted
//!
//! ## Usage
//! ```rust,ignore
//! use dice_core::compat::RuleBook;
//!
//! let rules = RuleBook::default();
//! let blocked = rules.is_blocked(Some("/dice/Dice/GiftDice.svg"), Category::Hat, &cone);
//! ```
//! ============================================================================

mod normalize;
mod rules;

pub use normalize::normalize;
pub use rules::{CategoryBlock, CompatibilityRule, RuleBook, WILDCARD};
