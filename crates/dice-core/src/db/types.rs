//! ============================================================================
//! Database Types - Serializable records for redb storage
//! ============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Selection;

/// A user's last settled selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSelection {
    pub user_id: String,
    pub selection: Selection,
    /// Unix seconds
    pub saved_at: i64,
}

/// Database statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbStats {
    pub total_selections: usize,
    /// Most recent save across all users
    pub last_saved_at: Option<i64>,
}
