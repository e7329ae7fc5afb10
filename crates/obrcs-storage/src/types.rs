//! Types shared by the consent store traits.

use serde::{Deserialize, Serialize};

/// Deletion-state filter applied to store queries.
///
/// Soft deletion is explicit in every query contract instead of a silently
/// applied filter, so a caller can never leak deleted records by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    /// Exclude soft-deleted consents; they behave as absent.
    #[default]
    ActiveOnly,
    /// Include soft-deleted consents (administrative reads only).
    IncludeDeleted,
}

impl Visibility {
    /// Whether a record with the given deleted flag passes this filter.
    #[must_use]
    pub fn admits(&self, deleted: bool) -> bool {
        match self {
            Visibility::ActiveOnly => !deleted,
            Visibility::IncludeDeleted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active_only() {
        assert_eq!(Visibility::default(), Visibility::ActiveOnly);
    }

    #[test]
    fn test_admits() {
        assert!(Visibility::ActiveOnly.admits(false));
        assert!(!Visibility::ActiveOnly.admits(true));
        assert!(Visibility::IncludeDeleted.admits(false));
        assert!(Visibility::IncludeDeleted.admits(true));
    }
}
