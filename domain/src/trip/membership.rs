//! Quorum-relevant membership size.

use serde::{Deserialize, Serialize};

/// Number of voting members of a trip (Value Object)
///
/// The owner is never a materialized collaborator row, so the total is always
/// `collaborators + 1`. Build it from the collaborator count and never add
/// the owner anywhere else.
///
/// # Example
///
/// ```
/// use tripvote_domain::MemberCount;
///
/// let count = MemberCount::from_collaborators(2);
/// assert_eq!(count.total(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCount {
    collaborators: usize,
}

impl MemberCount {
    pub fn from_collaborators(collaborators: usize) -> Self {
        Self { collaborators }
    }

    /// Explicit collaborator rows, excluding the owner
    pub fn collaborators(&self) -> usize {
        self.collaborators
    }

    /// Total voting members, owner included
    pub fn total(&self) -> usize {
        self.collaborators + 1
    }
}

impl std::fmt::Display for MemberCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} members", self.total())
    }
}
