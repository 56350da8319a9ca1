//! Error types for the customization engine.

use crate::types::Category;

/// Why a mutation was refused. The selection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{resource_ref} is not compatible with the selected dice ({category})")]
    Blocked {
        category: Category,
        resource_ref: String,
    },

    #[error("{resource_ref} is locked ({category})")]
    Locked {
        category: Category,
        resource_ref: String,
    },

    #[error("{resource_ref} is not in the {category} catalog")]
    UnknownItem {
        category: Category,
        resource_ref: String,
    },
}

impl SelectionError {
    /// Category the rejected choice was made in
    pub fn category(&self) -> Category {
        match self {
            SelectionError::Blocked { category, .. }
            | SelectionError::Locked { category, .. }
            | SelectionError::UnknownItem { category, .. } => *category,
        }
    }
}

/// Failure reading a config or catalog file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
