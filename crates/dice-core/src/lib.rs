//! ============================================================================
//! DICE-CORE: My Dice customization engine
//! ============================================================================
//! This crate handles the logic behind a user's dice avatar:
//! - Catalog ranking and display names per cosmetic category
//! - Dice compatibility rules and name normalization
//! - Selection state with the repair cascade on dice changes
//! - Layer composition and persistence of saved selections via redb
//! ============================================================================

pub mod catalog;
pub mod compat;
pub mod config;
pub mod db;
pub mod error;
pub mod layers;
pub mod selection;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use types::*;
pub use catalog::{Catalog, OptionState, RankTables};
pub use compat::{normalize, CategoryBlock, CompatibilityRule, RuleBook};
pub use config::EngineConfig;
pub use db::DiceDb;
pub use error::{ConfigError, SelectionError};
pub use layers::{compose, RenderManifest};
pub use selection::{repair, repair_detailed, ClearReason, ClearedEntry, SelectionManager};
pub use session::{SelectionStore, Session};
