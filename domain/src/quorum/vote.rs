//! Vote types for trip consensus
//!
//! A vote is one member's like/pass decision on one candidate. The ledger
//! keeps exactly one vote per (trip, candidate, voter); casting again replaces
//! the previous decision. Likes are monotonic: once a voter has liked a
//! candidate, that like keeps counting toward quorum even after a pass.

use super::consensus::CandidateState;
use super::rule::QuorumRule;
use crate::core::error::DomainError;
use crate::trip::{CandidateId, MemberCount, TripId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member's decision on a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Like,
    Pass,
}

impl Decision {
    pub fn is_like(&self) -> bool {
        matches!(self, Decision::Like)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Like => "like",
            Decision::Pass => "pass",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" | "yes" | "right" => Ok(Decision::Like),
            "pass" | "no" | "left" => Ok(Decision::Pass),
            other => Err(DomainError::UnknownDecision(other.to_string())),
        }
    }
}

/// A single vote row in the ledger
///
/// # Example
///
/// ```
/// use tripvote_domain::{Decision, Vote};
///
/// let vote = Vote::new("lisbon", "hotel-1", "ana", Decision::Like);
/// assert!(vote.is_like());
/// assert_eq!(vote.key().2.as_str(), "ana");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub trip: TripId,
    pub candidate: CandidateId,
    pub voter: UserId,
    pub decision: Decision,
    pub cast_at: DateTime<Utc>,
    /// First time this voter liked the candidate; kept when a pass overwrites
    #[serde(default)]
    pub liked_at: Option<DateTime<Utc>>,
}

impl Vote {
    /// Create a vote stamped with the current time
    pub fn new(
        trip: impl Into<TripId>,
        candidate: impl Into<CandidateId>,
        voter: impl Into<UserId>,
        decision: Decision,
    ) -> Self {
        let cast_at = Utc::now();
        Self {
            trip: trip.into(),
            candidate: candidate.into(),
            voter: voter.into(),
            decision,
            cast_at,
            liked_at: decision.is_like().then_some(cast_at),
        }
    }

    /// Current decision is a like
    pub fn is_like(&self) -> bool {
        self.decision.is_like()
    }

    /// A like is on record for this voter, whatever the current decision
    pub fn has_liked(&self) -> bool {
        self.liked_at.is_some()
    }

    /// This vote replacing `previous` under the same key. The decision is
    /// overwritten; the first like survives.
    pub fn superseding(mut self, previous: &Vote) -> Self {
        if previous.liked_at.is_some() {
            self.liked_at = previous.liked_at;
        }
        self
    }

    /// Ledger identity of this vote
    pub fn key(&self) -> (&TripId, &CandidateId, &UserId) {
        (&self.trip, &self.candidate, &self.voter)
    }
}

/// Aggregated view of the votes on one candidate
///
/// `likes` counts voters with a like on record (the quorum count); `passes`
/// counts voters who never liked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub candidate: CandidateId,
    pub likes: usize,
    pub passes: usize,
    pub total_members: usize,
    pub threshold: usize,
    pub state: CandidateState,
}

impl VoteTally {
    /// Build a tally from the current ledger rows for one candidate
    pub fn from_votes(
        candidate: CandidateId,
        votes: &[Vote],
        members: MemberCount,
        rule: &QuorumRule,
        promoted: bool,
    ) -> Self {
        let likes = votes.iter().filter(|v| v.has_liked()).count();
        let passes = votes.len() - likes;

        Self {
            candidate,
            likes,
            passes,
            total_members: members.total(),
            threshold: rule.threshold(members),
            state: CandidateState::observe(votes.len(), promoted),
        }
    }

    /// Likes still missing before promotion, zero once reached
    pub fn likes_missing(&self) -> usize {
        self.threshold.saturating_sub(self.likes)
    }

    /// Visual summary, one mark per voter (e.g., "[●●○]")
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.likes));
        summary.extend(std::iter::repeat_n('○', self.passes));
        summary.push(']');
        summary
    }
}
