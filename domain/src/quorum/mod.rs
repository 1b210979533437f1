//! Trip consensus domain
//!
//! Members of a trip like or pass candidates. Once the likes on a candidate
//! reach the trip's threshold, the candidate is promoted into the shared
//! itinerary, exactly once.
//!
//! # Threshold
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  total members = collaborators + 1 (owner)               │
//! │  threshold     = floor(total / 2) + 1   (majority rule)  │
//! │                                                          │
//! │  total:      1   2   3   4   5                           │
//! │  threshold:  1   2   2   3   3                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod rule;
pub mod vote;

// Re-export main types
pub use consensus::{CandidateState, VoteOutcome};
pub use rule::QuorumRule;
pub use vote::{Decision, Vote, VoteTally};
