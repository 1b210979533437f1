//! Consensus state for a single (trip, candidate) pair
//!
//! ```text
//! Unvoted ──any vote──▶ Active ──likes reach threshold──▶ Promoted
//! ```
//!
//! `Promoted` is terminal: later votes are still recorded but never move the
//! pair back.

use serde::{Deserialize, Serialize};

/// Lifecycle of a candidate within one trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateState {
    /// Nobody has voted yet
    Unvoted,
    /// Votes are accumulating, not promoted
    Active,
    /// In the itinerary
    Promoted,
}

impl CandidateState {
    /// Derive the state from what the stores currently hold
    pub fn observe(vote_count: usize, promoted: bool) -> Self {
        if promoted {
            CandidateState::Promoted
        } else if vote_count == 0 {
            CandidateState::Unvoted
        } else {
            CandidateState::Active
        }
    }

    pub fn is_promoted(&self) -> bool {
        matches!(self, CandidateState::Promoted)
    }
}

impl std::fmt::Display for CandidateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateState::Unvoted => write!(f, "Unvoted"),
            CandidateState::Active => write!(f, "Active"),
            CandidateState::Promoted => write!(f, "Promoted"),
        }
    }
}

/// Result of casting a vote
///
/// `matched` is always explicit: a call that could not check the quorum fails
/// instead of returning `matched = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// The candidate has reached quorum
    pub matched: bool,
    /// The candidate was already in the itinerary when this call tried to
    /// promote it (including losing a concurrent insert race)
    pub already_promoted: bool,
}

impl VoteOutcome {
    /// Quorum not reached (or the vote was a pass)
    pub fn not_matched() -> Self {
        Self {
            matched: false,
            already_promoted: false,
        }
    }

    /// This call inserted the itinerary item
    pub fn promoted() -> Self {
        Self {
            matched: true,
            already_promoted: false,
        }
    }

    /// Quorum reached but another call had already promoted the candidate
    pub fn already_promoted() -> Self {
        Self {
            matched: true,
            already_promoted: true,
        }
    }

    /// Whether this call performed the promotion
    pub fn is_first_promotion(&self) -> bool {
        self.matched && !self.already_promoted
    }
}
